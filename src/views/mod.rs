pub mod app;
pub mod map_view;
pub mod delivery_info;
pub mod dashboard;

pub use app::{render_app, APP_TITLE};
pub use map_view::{render_map_view, update_fetch_button, MapViewElements, MAP_CONTAINER_ID};
pub use delivery_info::render_delivery_info;
pub use dashboard::render_dashboard;
