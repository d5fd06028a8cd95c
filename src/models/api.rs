// ============================================================================
// API MODELS - Cuerpos de request/response del backend
// ============================================================================
// El backend envuelve casi todo en un objeto ({"optimized_routes": ...},
// {"predicted_delivery_time": ...}); se acepta también el valor pelado.
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::models::delivery::OrderPriority;
use crate::models::route::Route;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub order_priority: OrderPriority,
    pub customer_location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeRequest {
    pub num_vehicles: u32,
}

/// Tiempo estimado de entrega (minutos). El modelo devuelve un número,
/// pero se tolera texto.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PredictedTime {
    Minutes(f64),
    Text(String),
}

impl fmt::Display for PredictedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictedTime::Minutes(minutes) => write!(f, "{}", minutes),
            PredictedTime::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Wrapped { predicted_delivery_time: PredictedTime },
    Bare(PredictedTime),
}

impl PredictResponse {
    pub fn into_time(self) -> PredictedTime {
        match self {
            PredictResponse::Wrapped { predicted_delivery_time } => predicted_delivery_time,
            PredictResponse::Bare(time) => time,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptimizeResponse {
    /// `null` cuando el solver no encontró solución
    Wrapped { optimized_routes: Option<Vec<Route>> },
    Bare(Vec<Route>),
}

impl OptimizeResponse {
    pub fn into_routes(self) -> Vec<Route> {
        match self {
            OptimizeResponse::Wrapped { optimized_routes } => optimized_routes.unwrap_or_default(),
            OptimizeResponse::Bare(routes) => routes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrainResponse {
    Wrapped { message: String },
    Bare(String),
}

impl TrainResponse {
    pub fn into_message(self) -> String {
        match self {
            TrainResponse::Wrapped { message } | TrainResponse::Bare(message) => message,
        }
    }
}

/// Forma con la que el backend reporta fallos (a veces con HTTP 200)
#[derive(Debug, Deserialize)]
pub struct BackendErrorPayload {
    pub error: String,
}

/// Forma de error de validación (HTTP 422)
#[derive(Debug, Deserialize)]
pub struct ValidationErrorPayload {
    pub detail: serde_json::Value,
}
