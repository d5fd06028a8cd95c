// ============================================================================
// DELIVERY API - Contrato del backend + normalización de respuestas
// ============================================================================
// El trait es la costura entre ViewModels y transporte: en el navegador lo
// implementa `ApiClient` (gloo-net); en tests, un fake en memoria.
// ============================================================================

use serde::de::DeserializeOwned;
use crate::error::ApiError;
use crate::models::{Delivery, OrderPriority, PredictedTime, Route};
use crate::models::api::{BackendErrorPayload, ValidationErrorPayload};

pub const DELIVERIES_PATH: &str = "/deliveries";
pub const PREDICT_PATH: &str = "/predict";
pub const OPTIMIZE_PATH: &str = "/optimize";
pub const TRAIN_MODEL_PATH: &str = "/train_model";

/// Las cuatro llamadas remotas del dashboard.
///
/// Un solo intento por llamada: sin reintentos, sin backoff.
#[allow(async_fn_in_trait)]
pub trait DeliveryApi {
    /// `GET /deliveries`
    async fn fetch_deliveries(&self) -> Result<Vec<Delivery>, ApiError>;

    /// `POST /predict`. No valida la entrada: una ubicación vacía llega tal cual al backend.
    async fn predict_delivery_time(
        &self,
        priority: OrderPriority,
        location: &str,
    ) -> Result<PredictedTime, ApiError>;

    /// `POST /optimize`
    async fn fetch_optimized_routes(&self, vehicle_count: u32) -> Result<Vec<Route>, ApiError>;

    /// `POST /train_model`
    async fn retrain_model(&self) -> Result<String, ApiError>;
}

/// Respuesta HTTP cruda, antes de normalizar
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Política única de errores para todas las llamadas.
///
/// - status no-2xx: `Rejected` con el detalle del servidor, o el mensaje
///   genérico si el cuerpo viene vacío
/// - 2xx con `{"error": ...}`: `Backend`
/// - 2xx que no encaja con `T`: `Decode`
pub fn normalize_response<T: DeserializeOwned>(raw: &RawResponse) -> Result<T, ApiError> {
    if !raw.is_success() {
        return match server_detail(&raw.body) {
            Some(detail) => Err(ApiError::Rejected { status: raw.status, detail }),
            None => Err(ApiError::Unreachable),
        };
    }

    if let Ok(payload) = serde_json::from_str::<BackendErrorPayload>(&raw.body) {
        return Err(ApiError::Backend(payload.error));
    }

    serde_json::from_str::<T>(&raw.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extraer el detalle legible de un cuerpo de error
fn server_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(payload) = serde_json::from_str::<BackendErrorPayload>(body) {
        return Some(payload.error);
    }
    if let Ok(payload) = serde_json::from_str::<ValidationErrorPayload>(body) {
        return Some(match payload.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        });
    }

    Some(body.to_string())
}
