pub mod delivery;
pub mod route;
pub mod api;

pub use delivery::{Delivery, LngLat, OrderPriority, distinct_locations};
pub use route::Route;
pub use api::{PredictedTime, PredictRequest, OptimizeRequest};
