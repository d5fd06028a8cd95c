// ============================================================================
// DELIVERY INFO VIEWMODEL - Selección de prioridad/ubicación + predicción
// ============================================================================
// Dueño del estado de selección. La ubicación elegida se propaga al padre
// (Map View) mediante callback.
// ============================================================================

use std::rc::Rc;
use crate::models::{distinct_locations, Delivery, OrderPriority, PredictedTime};
use crate::services::DeliveryApi;
use crate::state::{ReactiveState, ViewLifetime, ViewStatus};

/// Callback hacia el padre cuando cambia la ubicación seleccionada
pub type LocationCallback = Rc<dyn Fn(&str)>;

/// Lo que se muestra bajo el botón "Predict Time"
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PredictionDisplay {
    #[default]
    Empty,
    Estimate(PredictedTime),
    Error(String),
}

impl PredictionDisplay {
    pub fn text(&self) -> Option<String> {
        match self {
            PredictionDisplay::Empty => None,
            PredictionDisplay::Estimate(time) => {
                Some(format!("Estimated Delivery Time: {} minutes", time))
            }
            PredictionDisplay::Error(message) => Some(format!("Error: {}", message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeliveryInfoState {
    pub deliveries: Vec<Delivery>,
    pub order_priority: OrderPriority,
    pub customer_location: String,
    pub load_status: ViewStatus,
    pub prediction_status: ViewStatus,
    pub prediction: PredictionDisplay,
}

impl DeliveryInfoState {
    /// Opciones del selector de ubicación
    pub fn location_options(&self) -> Vec<String> {
        distinct_locations(&self.deliveries)
    }
}

pub struct DeliveryInfoViewModel<A: DeliveryApi> {
    api: Rc<A>,
    state: ReactiveState<DeliveryInfoState>,
    lifetime: ViewLifetime,
    on_select_change: Option<LocationCallback>,
}

impl<A: DeliveryApi> Clone for DeliveryInfoViewModel<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            lifetime: self.lifetime.clone(),
            on_select_change: self.on_select_change.clone(),
        }
    }
}

impl<A: DeliveryApi> DeliveryInfoViewModel<A> {
    pub fn new(api: Rc<A>, on_select_change: Option<LocationCallback>) -> Self {
        Self {
            api,
            state: ReactiveState::new(DeliveryInfoState::default()),
            lifetime: ViewLifetime::new(),
            on_select_change,
        }
    }

    pub fn state(&self) -> ReactiveState<DeliveryInfoState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> DeliveryInfoState {
        self.state.get()
    }

    /// Montaje: cargar pedidos y seleccionar la ubicación del primero
    pub async fn mount(&self) {
        let ticket = self.lifetime.mount();
        self.state.update(|s| s.load_status = ViewStatus::Loading);

        let result = self.api.fetch_deliveries().await;
        if !self.lifetime.is_current(ticket) {
            log::warn!("⚠️ [INFO] Pedidos llegaron después de desmontar, descartados");
            return;
        }

        match result {
            Ok(deliveries) => {
                log::info!("📋 [INFO] {} pedidos cargados", deliveries.len());
                let first_location = deliveries.first().map(|d| d.customer_location.clone());
                self.state.update(|s| {
                    s.deliveries = deliveries;
                    if let Some(location) = &first_location {
                        s.customer_location = location.clone();
                    }
                    s.load_status = ViewStatus::Ready;
                });
                if let Some(location) = first_location {
                    self.notify_parent(&location);
                }
            }
            Err(e) => {
                log::error!("❌ Error fetching deliveries: {}", e);
                self.state.update(|s| s.load_status = ViewStatus::Error(e.message()));
            }
        }
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
        self.state.clear_subscribers();
    }

    /// Cambio de prioridad: solo estado local
    pub fn set_priority(&self, priority: OrderPriority) {
        self.state.update(|s| s.order_priority = priority);
    }

    /// Cambio de ubicación: estado local + callback al padre
    pub fn set_location(&self, location: &str) {
        self.state.update(|s| s.customer_location = location.to_string());
        self.notify_parent(location);
    }

    fn notify_parent(&self, location: &str) {
        if let Some(callback) = &self.on_select_change {
            callback(location);
        }
    }

    /// "Predict Time": el error se muestra inline, nunca se propaga
    pub async fn predict(&self) {
        if self.state.with(|s| s.prediction_status.is_loading()) {
            log::warn!("⚠️ [INFO] Predicción en curso, ignorando click");
            return;
        }

        let ticket = self.lifetime.ticket();
        let (priority, location) =
            self.state.with(|s| (s.order_priority, s.customer_location.clone()));
        self.state.update(|s| s.prediction_status = ViewStatus::Loading);

        let result = self.api.predict_delivery_time(priority, &location).await;
        if !self.lifetime.is_current(ticket) {
            log::warn!("⚠️ [INFO] Predicción llegó después de desmontar, descartada");
            return;
        }

        match result {
            Ok(time) => {
                log::info!("✅ [INFO] Tiempo estimado: {} minutos", time);
                self.state.update(|s| {
                    s.prediction = PredictionDisplay::Estimate(time);
                    s.prediction_status = ViewStatus::Ready;
                });
            }
            Err(e) => {
                log::error!("❌ Prediction failed: {}", e);
                let message = e.message();
                self.state.update(|s| {
                    s.prediction = PredictionDisplay::Error(message.clone());
                    s.prediction_status = ViewStatus::Error(message);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use futures::executor::block_on;
    use crate::error::ApiError;
    use crate::testing::{ApiCall, FakeDeliveryApi};

    fn deliveries() -> Vec<Delivery> {
        vec![
            Delivery::new("ORD001", "Chennai Central, India", 13.08, 80.27, OrderPriority::High),
            Delivery::new("ORD002", "Pune Junction, India", 18.52, 73.87, OrderPriority::Low),
            Delivery::new("ORD003", "Chennai Central, India", 13.08, 80.27, OrderPriority::Medium),
        ]
    }

    fn recording_callback() -> (LocationCallback, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (Rc::new(move |loc: &str| sink.borrow_mut().push(loc.to_string())), seen)
    }

    #[test]
    fn mount_selects_first_location_and_lists_distinct_options() {
        let api = FakeDeliveryApi::with_deliveries(deliveries());
        let (callback, seen) = recording_callback();
        let vm = DeliveryInfoViewModel::new(api, Some(callback));

        block_on(vm.mount());

        let state = vm.snapshot();
        assert_eq!(state.customer_location, "Chennai Central, India");
        assert_eq!(
            state.location_options(),
            vec!["Chennai Central, India", "Pune Junction, India"]
        );
        assert_eq!(state.load_status, ViewStatus::Ready);
        assert_eq!(state.order_priority, OrderPriority::Medium);
        assert_eq!(*seen.borrow(), vec!["Chennai Central, India"]);
    }

    #[test]
    fn location_change_propagates_but_priority_does_not() {
        let api = FakeDeliveryApi::with_deliveries(deliveries());
        let (callback, seen) = recording_callback();
        let vm = DeliveryInfoViewModel::new(api, Some(callback));
        block_on(vm.mount());

        vm.set_priority(OrderPriority::High);
        vm.set_location("Pune Junction, India");

        let state = vm.snapshot();
        assert_eq!(state.order_priority, OrderPriority::High);
        assert_eq!(state.customer_location, "Pune Junction, India");
        assert_eq!(seen.borrow().last().map(String::as_str), Some("Pune Junction, India"));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn predict_shows_estimate() {
        let api = FakeDeliveryApi::with_deliveries(deliveries());
        *api.prediction.borrow_mut() = Ok(PredictedTime::Minutes(42.5));
        let vm = DeliveryInfoViewModel::new(api.clone(), None);
        block_on(vm.mount());
        vm.set_priority(OrderPriority::Low);

        block_on(vm.predict());

        assert_eq!(
            vm.snapshot().prediction.text().as_deref(),
            Some("Estimated Delivery Time: 42.5 minutes")
        );
        assert!(api.calls().contains(&ApiCall::Predict {
            priority: OrderPriority::Low,
            location: "Chennai Central, India".to_string(),
        }));
    }

    #[test]
    fn predict_failure_is_shown_inline() {
        let api = FakeDeliveryApi::with_deliveries(deliveries());
        *api.prediction.borrow_mut() = Err(ApiError::Backend("model not trained".to_string()));
        let vm = DeliveryInfoViewModel::new(api, None);
        block_on(vm.mount());

        block_on(vm.predict());

        let state = vm.snapshot();
        let text = state.prediction.text().unwrap();
        assert!(text.starts_with("Error:"));
        assert!(text.contains("model not trained"));
        assert!(state.prediction_status.error().is_some());
    }

    #[test]
    fn empty_list_predicts_with_empty_location() {
        let api = FakeDeliveryApi::with_deliveries(Vec::new());
        let (callback, seen) = recording_callback();
        let vm = DeliveryInfoViewModel::new(api.clone(), Some(callback));
        block_on(vm.mount());

        assert!(vm.snapshot().location_options().is_empty());
        assert!(seen.borrow().is_empty());

        block_on(vm.predict());
        assert!(api.calls().contains(&ApiCall::Predict {
            priority: OrderPriority::Medium,
            location: String::new(),
        }));
    }

    #[test]
    fn fetch_failure_is_absorbed() {
        let api = Rc::new(FakeDeliveryApi::default());
        *api.deliveries.borrow_mut() = Err(ApiError::Unreachable);
        let vm = DeliveryInfoViewModel::new(api, None);

        block_on(vm.mount());

        let state = vm.snapshot();
        assert!(state.deliveries.is_empty());
        assert_eq!(
            state.load_status,
            ViewStatus::Error("API Error: Unable to complete request".to_string())
        );
    }

    #[test]
    fn late_deliveries_after_unmount_are_ignored() {
        let api = FakeDeliveryApi::with_deliveries(deliveries());
        let (callback, seen) = recording_callback();
        let vm = DeliveryInfoViewModel::new(api.clone(), Some(callback));
        {
            let vm = vm.clone();
            *api.before_response.borrow_mut() = Some(Box::new(move || vm.unmount()));
        }

        block_on(vm.mount());

        assert!(vm.snapshot().deliveries.is_empty());
        assert!(seen.borrow().is_empty());
    }
}
