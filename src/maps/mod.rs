// Módulo de mapas: trait común + implementación web (Mapbox GL JS)

#[cfg(target_arch = "wasm32")]
pub mod web;

pub mod traits;

pub use traits::{MapError, MapRenderer, RouteLayer};

#[cfg(target_arch = "wasm32")]
pub use web::WebMapRenderer;
