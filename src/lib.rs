// ============================================================================
// LOGISTICS DASHBOARD - FRONTEND MVVM (RUST PURO)
// ============================================================================
// Arquitectura MVVM:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: SOLO comunicación API
// - Maps: SOLO dibujo (Mapbox GL JS)
// - State: ReactiveState con Rc<RefCell>
// - Models: Estructuras compartidas con backend
//
// Todo lo que toca el navegador está detrás de cfg(wasm32); el resto se
// testea en host.
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod maps;
pub mod state;
pub mod viewmodels;
pub mod utils;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod views;
#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(test)]
mod testing;

#[cfg(target_arch = "wasm32")]
pub use entry::*;

#[cfg(target_arch = "wasm32")]
mod entry {
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;
    use crate::app::{App, DashboardApp};
    use crate::config::AppConfig;
    use crate::dom::get_element_by_id;

    const APP_ROOT_ID: &str = "app";

    // Instancias montadas (una por tipo)
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
        static DASHBOARD: RefCell<Option<DashboardApp>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        // Inicializar panic hook para mejor debugging
        console_error_panic_hook::set_once();

        let config = AppConfig::from_env();
        wasm_logger::init(wasm_logger::Config::new(config.log_level()));
        log::info!("🚀 Logistics Delivery System - Rust Puro + MVVM");
        log::debug!("⚙️ Backend: {}", config.backend_url);
        if config.mapbox_token().is_empty() {
            log::warn!("⚠️ MAPBOX_ACCESS_TOKEN vacío: el mapa no cargará tiles");
        }

        if get_element_by_id(APP_ROOT_ID).is_none() {
            log::warn!("⚠️ No hay #{}, la app no se monta automáticamente", APP_ROOT_ID);
            return Ok(());
        }

        let app = App::mount(APP_ROOT_ID, &config)?;
        APP.with(|cell| *cell.borrow_mut() = Some(app));
        Ok(())
    }

    /// Montar el Dashboard (tabla + "Retrain Model") en `container_id`
    #[wasm_bindgen]
    pub fn mount_dashboard(container_id: &str) -> Result<(), JsValue> {
        // Un solo dashboard a la vez: el anterior se desmonta antes de renderizar
        if let Some(previous) = DASHBOARD.with(|cell| cell.borrow_mut().take()) {
            previous.unmount();
        }
        let dashboard = DashboardApp::mount(container_id, &AppConfig::from_env())?;
        DASHBOARD.with(|cell| *cell.borrow_mut() = Some(dashboard));
        Ok(())
    }

    /// Desmontar todo: mapa destruido y respuestas pendientes descartadas
    #[wasm_bindgen]
    pub fn unmount_app() {
        if let Some(app) = APP.with(|cell| cell.borrow_mut().take()) {
            app.unmount();
        }
        if let Some(dashboard) = DASHBOARD.with(|cell| cell.borrow_mut().take()) {
            dashboard.unmount();
        }
    }
}
