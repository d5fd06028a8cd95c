// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP y delega la
// normalización de errores a `normalize_response`
// ============================================================================

use gloo_net::http::{Request, Response};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{Delivery, OrderPriority, PredictedTime, PredictRequest, OptimizeRequest, Route};
use crate::models::api::{OptimizeResponse, PredictResponse, TrainResponse};
use crate::services::delivery_api::{
    normalize_response, DeliveryApi, RawResponse, DELIVERIES_PATH, OPTIMIZE_PATH, PREDICT_PATH,
    TRAIN_MODEL_PATH,
};

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Leer status + cuerpo; cualquier fallo de transporte es `Unreachable`
    async fn read(result: Result<Response, gloo_net::Error>) -> Result<RawResponse, ApiError> {
        let response = result.map_err(|e| {
            log::error!("❌ API Error (network): {}", e);
            ApiError::Unreachable
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log::error!("❌ API Error (body): {}", e);
            ApiError::Unreachable
        })?;

        Ok(RawResponse { status, body })
    }

    fn log_failure<T>(endpoint: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            log::error!("❌ API Error en {}: {}", endpoint, e);
        }
        result
    }
}

impl DeliveryApi for ApiClient {
    async fn fetch_deliveries(&self) -> Result<Vec<Delivery>, ApiError> {
        let raw = Self::read(Request::get(&self.url(DELIVERIES_PATH)).send().await).await?;
        let result = normalize_response::<Vec<Delivery>>(&raw);
        if let Ok(deliveries) = &result {
            log::info!("📦 {} pedidos recibidos", deliveries.len());
        }
        Self::log_failure(DELIVERIES_PATH, result)
    }

    async fn predict_delivery_time(
        &self,
        priority: OrderPriority,
        location: &str,
    ) -> Result<PredictedTime, ApiError> {
        let body = PredictRequest {
            order_priority: priority,
            customer_location: location.to_string(),
        };
        log::info!("⏱️ Prediciendo tiempo de entrega: {} / {:?}", priority, location);

        let request = Request::post(&self.url(PREDICT_PATH))
            .json(&body)
            .map_err(|e| ApiError::InvalidInput(format!("Serialization error: {}", e)))?;
        let raw = Self::read(request.send().await).await?;

        Self::log_failure(
            PREDICT_PATH,
            normalize_response::<PredictResponse>(&raw).map(PredictResponse::into_time),
        )
    }

    async fn fetch_optimized_routes(&self, vehicle_count: u32) -> Result<Vec<Route>, ApiError> {
        if vehicle_count == 0 {
            return Err(ApiError::InvalidInput("vehicle count must be positive".to_string()));
        }
        log::info!("🗺️ Optimizando rutas para {} vehículos", vehicle_count);

        let request = Request::post(&self.url(OPTIMIZE_PATH))
            .json(&OptimizeRequest { num_vehicles: vehicle_count })
            .map_err(|e| ApiError::InvalidInput(format!("Serialization error: {}", e)))?;
        let raw = Self::read(request.send().await).await?;

        let result = normalize_response::<OptimizeResponse>(&raw).map(OptimizeResponse::into_routes);
        if let Ok(routes) = &result {
            log::info!("✅ {} rutas optimizadas", routes.len());
        }
        Self::log_failure(OPTIMIZE_PATH, result)
    }

    async fn retrain_model(&self) -> Result<String, ApiError> {
        log::info!("🧠 Reentrenando modelo...");
        let raw = Self::read(Request::post(&self.url(TRAIN_MODEL_PATH)).send().await).await?;
        Self::log_failure(
            TRAIN_MODEL_PATH,
            normalize_response::<TrainResponse>(&raw).map(TrainResponse::into_message),
        )
    }
}
