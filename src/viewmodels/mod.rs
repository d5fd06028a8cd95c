pub mod delivery_info_viewmodel;
pub mod map_viewmodel;
pub mod dashboard_viewmodel;

pub use delivery_info_viewmodel::{DeliveryInfoViewModel, DeliveryInfoState, LocationCallback, PredictionDisplay};
pub use map_viewmodel::{MapViewModel, MapViewState, FetchRoutesOutcome, NO_LOCATION_ALERT, plan_route_overlays};
pub use dashboard_viewmodel::{DashboardViewModel, DashboardState};
