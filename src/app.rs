// ============================================================================
// APP - Montaje de vistas + wiring de ViewModels
// ============================================================================
// Cada vista se suscribe a su ViewModel; los cambios se batchean con un
// Timeout(0) para no re-renderizar varias veces en el mismo tick.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::config::AppConfig;
use crate::dom::{append_child, clear_children, get_element_by_id};
use crate::maps::WebMapRenderer;
use crate::services::ApiClient;
use crate::state::ViewStatus;
use crate::viewmodels::{DashboardViewModel, DeliveryInfoViewModel, MapViewModel};
use crate::views::{
    render_app, render_dashboard, render_delivery_info, render_map_view, update_fetch_button,
    MAP_CONTAINER_ID,
};

pub type LiveMapViewModel = MapViewModel<ApiClient, WebMapRenderer>;

/// Ejecutar `render` en el próximo tick; colapsa notificaciones repetidas
fn schedule_render(pending: &Rc<Cell<bool>>, render: impl FnOnce() + 'static) {
    if pending.replace(true) {
        return;
    }
    let pending = pending.clone();
    Timeout::new(0, move || {
        pending.set(false);
        render();
    })
    .forget();
}

fn find_root(container_id: &str) -> Result<Element, JsValue> {
    get_element_by_id(container_id)
        .ok_or_else(|| JsValue::from_str(&format!("No #{} element found", container_id)))
}

/// Shell principal: título + Map View (con el panel anidado)
pub struct App {
    root: Element,
    map_vm: LiveMapViewModel,
    info_vm: DeliveryInfoViewModel<ApiClient>,
}

impl App {
    pub fn mount(container_id: &str, config: &AppConfig) -> Result<Self, JsValue> {
        let root = find_root(container_id)?;
        let api = Rc::new(ApiClient::new(config));

        let map_vm: LiveMapViewModel = MapViewModel::new(api.clone(), config);
        let info_vm = DeliveryInfoViewModel::new(api, Some(map_vm.selection_callback()));

        let elements = render_map_view(&map_vm)?;
        clear_children(&root);
        append_child(&root, &render_app(elements.root)?)?;

        // Botón: solo label/disabled
        {
            let pending = Rc::new(Cell::new(false));
            let state = map_vm.state();
            let button = elements.fetch_button.clone();
            map_vm.state().subscribe(move || {
                let state = state.clone();
                let button = button.clone();
                schedule_render(&pending, move || {
                    if let Err(e) = update_fetch_button(&button, &state.get()) {
                        log::error!("❌ [APP] Error actualizando botón: {:?}", e);
                    }
                });
            });
        }

        // Panel: re-render completo
        {
            let pending = Rc::new(Cell::new(false));
            let panel = elements.info_panel.clone();
            let vm = info_vm.clone();
            info_vm.state().subscribe(move || {
                let panel = panel.clone();
                let vm = vm.clone();
                schedule_render(&pending, move || {
                    if let Err(e) = render_delivery_info(&panel, &vm) {
                        log::error!("❌ [APP] Error renderizando panel: {:?}", e);
                    }
                });
            });
        }
        render_delivery_info(&elements.info_panel, &info_vm)?;

        // El contenedor ya está en el documento: Mapbox puede engancharse
        match WebMapRenderer::create(MAP_CONTAINER_ID, config) {
            Ok(map) => {
                let vm = map_vm.clone();
                wasm_bindgen_futures::spawn_local(async move { vm.mount(map).await });
            }
            Err(e) => {
                log::error!("❌ [APP] No se pudo crear el mapa: {}", e);
                map_vm
                    .state()
                    .update(|s| s.load_status = ViewStatus::Error(e.to_string()));
            }
        }

        {
            let vm = info_vm.clone();
            wasm_bindgen_futures::spawn_local(async move { vm.mount().await });
        }

        log::info!("✅ [APP] Montada en #{}", container_id);
        Ok(Self { root, map_vm, info_vm })
    }

    /// Destruir el mapa, cortar requests pendientes y vaciar el contenedor
    pub fn unmount(&self) {
        self.info_vm.unmount();
        self.map_vm.unmount();
        clear_children(&self.root);
        log::info!("👋 [APP] Desmontada");
    }
}

/// Dashboard independiente (tabla + "Retrain Model")
pub struct DashboardApp {
    root: Element,
    vm: DashboardViewModel<ApiClient>,
}

impl DashboardApp {
    pub fn mount(container_id: &str, config: &AppConfig) -> Result<Self, JsValue> {
        let root = find_root(container_id)?;
        let vm = DashboardViewModel::new(Rc::new(ApiClient::new(config)));

        {
            let pending = Rc::new(Cell::new(false));
            let container = root.clone();
            let view_vm = vm.clone();
            vm.state().subscribe(move || {
                let container = container.clone();
                let view_vm = view_vm.clone();
                schedule_render(&pending, move || {
                    if let Err(e) = render_dashboard(&container, &view_vm) {
                        log::error!("❌ [DASHBOARD] Error renderizando: {:?}", e);
                    }
                });
            });
        }
        render_dashboard(&root, &vm)?;

        {
            let vm = vm.clone();
            wasm_bindgen_futures::spawn_local(async move { vm.mount().await });
        }

        log::info!("✅ [DASHBOARD] Montado en #{}", container_id);
        Ok(Self { root, vm })
    }

    pub fn unmount(&self) {
        self.vm.unmount();
        clear_children(&self.root);
    }
}
