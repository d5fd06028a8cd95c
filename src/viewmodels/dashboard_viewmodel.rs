// ============================================================================
// DASHBOARD VIEWMODEL - Tabla de pedidos + reentrenar modelo
// ============================================================================

use std::rc::Rc;
use crate::models::Delivery;
use crate::services::DeliveryApi;
use crate::state::{ReactiveState, ViewLifetime, ViewStatus};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub deliveries: Vec<Delivery>,
    pub load_status: ViewStatus,
    pub retrain_status: ViewStatus,
    /// Último mensaje devuelto por `/train_model`
    pub message: Option<String>,
}

pub struct DashboardViewModel<A: DeliveryApi> {
    api: Rc<A>,
    state: ReactiveState<DashboardState>,
    lifetime: ViewLifetime,
}

impl<A: DeliveryApi> Clone for DashboardViewModel<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            lifetime: self.lifetime.clone(),
        }
    }
}

impl<A: DeliveryApi> DashboardViewModel<A> {
    pub fn new(api: Rc<A>) -> Self {
        Self {
            api,
            state: ReactiveState::new(DashboardState::default()),
            lifetime: ViewLifetime::new(),
        }
    }

    pub fn state(&self) -> ReactiveState<DashboardState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.get()
    }

    pub async fn mount(&self) {
        let ticket = self.lifetime.mount();
        self.state.update(|s| s.load_status = ViewStatus::Loading);

        let result = self.api.fetch_deliveries().await;
        if !self.lifetime.is_current(ticket) {
            return;
        }

        match result {
            Ok(deliveries) => self.state.update(|s| {
                s.deliveries = deliveries;
                s.load_status = ViewStatus::Ready;
            }),
            Err(e) => {
                log::error!("❌ [DASHBOARD] {}", e);
                self.state.update(|s| s.load_status = ViewStatus::Error(e.message()));
            }
        }
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
        self.state.clear_subscribers();
    }

    /// "Retrain Model": muestra el mensaje o registra el error (sin mostrarlo)
    pub async fn retrain(&self) {
        if self.state.with(|s| s.retrain_status.is_loading()) {
            return;
        }

        let ticket = self.lifetime.ticket();
        self.state.update(|s| s.retrain_status = ViewStatus::Loading);

        let result = self.api.retrain_model().await;
        if !self.lifetime.is_current(ticket) {
            log::warn!("⚠️ [DASHBOARD] Respuesta de retrain descartada (vista desmontada)");
            return;
        }

        match result {
            Ok(message) => {
                log::info!("🧠 [DASHBOARD] {}", message);
                self.state.update(|s| {
                    s.message = Some(message);
                    s.retrain_status = ViewStatus::Ready;
                });
            }
            Err(e) => {
                log::error!("❌ [DASHBOARD] {}", e);
                self.state.update(|s| s.retrain_status = ViewStatus::Error(e.message()));
            }
        }
    }
}
