// ============================================================================
// MAP VIEW - Mapa de rutas + botón "Fetch Routes" + panel de pedidos
// ============================================================================
// El contenedor del mapa se crea una sola vez; Mapbox se engancha a él.
// Los re-renders solo tocan el botón (ver `update_fetch_button`).
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{alert, on_click, set_text_content, toggle_attribute, ElementBuilder};
use crate::maps::WebMapRenderer;
use crate::services::ApiClient;
use crate::viewmodels::{FetchRoutesOutcome, MapViewModel, MapViewState, NO_LOCATION_ALERT};

pub const MAP_CONTAINER_ID: &str = "map";
pub const MAP_VIEW_TITLE: &str = "Mapbox Optimized Routes";

/// Elementos que la app necesita después del primer render
pub struct MapViewElements {
    pub root: Element,
    pub fetch_button: Element,
    /// Contenedor donde se renderiza el panel anidado
    pub info_panel: Element,
}

pub fn render_map_view(
    vm: &MapViewModel<ApiClient, WebMapRenderer>,
) -> Result<MapViewElements, JsValue> {
    let fetch_button = ElementBuilder::new("button")?
        .class("fetch-routes-button")
        .attr("type", "button")?
        .build();
    update_fetch_button(&fetch_button, &vm.snapshot())?;

    {
        let vm = vm.clone();
        on_click(&fetch_button, move |_| {
            let vm = vm.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match vm.fetch_routes().await {
                    FetchRoutesOutcome::NoLocationSelected => alert(NO_LOCATION_ALERT),
                    outcome => log::debug!("🗺️ [MAP] Fetch Routes: {:?}", outcome),
                }
            });
        })?;
    }

    let map_container = ElementBuilder::new("div")?
        .id(MAP_CONTAINER_ID)?
        .class("map-container")
        .attr("style", "width: 100%; height: 500px;")?
        .build();

    let info_panel = ElementBuilder::new("div")?.class("info-panel").build();

    let root = ElementBuilder::new("div")?
        .class("map-view")
        .child(ElementBuilder::new("h1")?.text(MAP_VIEW_TITLE).build())?
        .child(fetch_button.clone())?
        .child(map_container)?
        .child(info_panel.clone())?
        .build();

    Ok(MapViewElements {
        root,
        fetch_button,
        info_panel,
    })
}

/// Label y `disabled` según el estado de carga de rutas
pub fn update_fetch_button(button: &Element, state: &MapViewState) -> Result<(), JsValue> {
    set_text_content(button, state.button_label());
    toggle_attribute(button, "disabled", state.route_status.is_loading())
}
