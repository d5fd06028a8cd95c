pub mod delivery_api;

#[cfg(target_arch = "wasm32")]
pub mod api_client;

pub use delivery_api::{DeliveryApi, RawResponse, normalize_response};

#[cfg(target_arch = "wasm32")]
pub use api_client::ApiClient;
