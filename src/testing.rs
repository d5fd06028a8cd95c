// Fakes para tests: backend en memoria y mapa que registra operaciones

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use crate::error::ApiError;
use crate::maps::{MapError, MapRenderer, RouteLayer};
use crate::models::{Delivery, LngLat, OrderPriority, PredictedTime, Route};
use crate::services::DeliveryApi;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchDeliveries,
    Predict { priority: OrderPriority, location: String },
    Optimize { vehicle_count: u32 },
    Retrain,
}

/// Backend en memoria con respuestas configurables
pub struct FakeDeliveryApi {
    pub deliveries: RefCell<Result<Vec<Delivery>, ApiError>>,
    pub prediction: RefCell<Result<PredictedTime, ApiError>>,
    pub routes: RefCell<Result<Vec<Route>, ApiError>>,
    pub retrain: RefCell<Result<String, ApiError>>,
    pub calls: RefCell<Vec<ApiCall>>,
    /// Se ejecuta justo antes de "responder" (p.ej. para desmontar la vista)
    pub before_response: RefCell<Option<Box<dyn Fn()>>>,
}

impl Default for FakeDeliveryApi {
    fn default() -> Self {
        Self {
            deliveries: RefCell::new(Ok(Vec::new())),
            prediction: RefCell::new(Ok(PredictedTime::Minutes(0.0))),
            routes: RefCell::new(Ok(Vec::new())),
            retrain: RefCell::new(Ok("Model retrained and saved.".to_string())),
            calls: RefCell::new(Vec::new()),
            before_response: RefCell::new(None),
        }
    }
}

impl FakeDeliveryApi {
    pub fn with_deliveries(deliveries: Vec<Delivery>) -> Rc<Self> {
        let api = Self::default();
        *api.deliveries.borrow_mut() = Ok(deliveries);
        Rc::new(api)
    }

    pub fn set_routes(&self, routes: Result<Vec<Vec<i64>>, ApiError>) {
        *self.routes.borrow_mut() = routes.map(|r| r.into_iter().map(Route::from).collect());
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.borrow_mut().push(call);
        if let Some(hook) = self.before_response.borrow().as_ref() {
            hook();
        }
    }
}

impl DeliveryApi for FakeDeliveryApi {
    async fn fetch_deliveries(&self) -> Result<Vec<Delivery>, ApiError> {
        self.record(ApiCall::FetchDeliveries);
        self.deliveries.borrow().clone()
    }

    async fn predict_delivery_time(
        &self,
        priority: OrderPriority,
        location: &str,
    ) -> Result<PredictedTime, ApiError> {
        self.record(ApiCall::Predict { priority, location: location.to_string() });
        self.prediction.borrow().clone()
    }

    async fn fetch_optimized_routes(&self, vehicle_count: u32) -> Result<Vec<Route>, ApiError> {
        self.record(ApiCall::Optimize { vehicle_count });
        self.routes.borrow().clone()
    }

    async fn retrain_model(&self) -> Result<String, ApiError> {
        self.record(ApiCall::Retrain);
        self.retrain.borrow().clone()
    }
}

/// Mapa que solo registra lo que se dibuja
#[derive(Default)]
pub struct RecordingMapRenderer {
    pub layers: BTreeMap<String, RouteLayer>,
    pub markers: Vec<LngLat>,
    pub removed_layers: Vec<String>,
    pub destroyed: bool,
    /// Falla al dibujar la capa con este id
    pub fail_on_layer: Option<String>,
}

impl RecordingMapRenderer {
    pub fn layer(&self, id: &str) -> Option<&RouteLayer> {
        self.layers.get(id)
    }
}

impl MapRenderer for RecordingMapRenderer {
    fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<(), MapError> {
        if self.layers.remove(layer_id).is_none() {
            return Err(MapError::Js(format!("layer {} does not exist", layer_id)));
        }
        self.removed_layers.push(layer_id.to_string());
        Ok(())
    }

    fn add_route_layer(&mut self, layer: &RouteLayer) -> Result<(), MapError> {
        if self.destroyed {
            return Err(MapError::NotReady);
        }
        if self.fail_on_layer.as_deref() == Some(layer.id.as_str()) {
            return Err(MapError::Js(format!("cannot add {}", layer.id)));
        }
        if self.layers.contains_key(&layer.id) {
            return Err(MapError::Js(format!("layer {} already exists", layer.id)));
        }
        self.layers.insert(layer.id.clone(), layer.clone());
        Ok(())
    }

    fn add_marker(&mut self, position: LngLat) -> Result<(), MapError> {
        if self.destroyed {
            return Err(MapError::NotReady);
        }
        self.markers.push(position);
        Ok(())
    }

    fn clear_markers(&mut self) -> Result<(), MapError> {
        self.markers.clear();
        Ok(())
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn destroy(&mut self) {
        self.markers.clear();
        self.layers.clear();
        self.destroyed = true;
    }
}
