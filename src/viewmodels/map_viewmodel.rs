// ============================================================================
// MAP VIEWMODEL - Lógica del mapa de rutas optimizadas
// ============================================================================
// Dueño del ciclo de vida del mapa, de la lista de pedidos y del redibujado
// de rutas. La vista solo traduce clicks y muestra el estado.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::{AppConfig, RouteStyle};
use crate::maps::{MapError, MapRenderer, RouteLayer};
use crate::models::{Delivery, LngLat, Route};
use crate::services::DeliveryApi;
use crate::state::{ReactiveState, ViewLifetime, ViewStatus};
use crate::viewmodels::LocationCallback;

/// Aviso cuando se pide "Fetch Routes" sin ubicación seleccionada
pub const NO_LOCATION_ALERT: &str = "No customer's location has been selected";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapViewState {
    pub deliveries: Vec<Delivery>,
    pub selected_location: Option<String>,
    pub load_status: ViewStatus,
    pub route_status: ViewStatus,
    /// Capas `route-{i}` que pueden existir en el mapa (cota para limpiar)
    pub drawn_layers: usize,
    pub marker_count: usize,
}

impl MapViewState {
    pub fn button_label(&self) -> &'static str {
        if self.route_status.is_loading() {
            "Loading Routes"
        } else {
            "Fetch Routes"
        }
    }
}

/// Resultado de un click en "Fetch Routes"
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRoutesOutcome {
    /// Sin ubicación: no hubo llamada de red, la vista debe avisar
    NoLocationSelected,
    /// Ya hay un fetch en curso
    AlreadyLoading,
    /// No hay mapa montado: ni request ni dibujo
    MapUnavailable,
    /// La respuesta llegó tarde, después de desmontar
    Discarded,
    Failed(String),
    Drawn { layers: usize, markers: usize },
}

/// Convertir las rutas en capas dibujables.
///
/// Cada índice se resuelve contra `deliveries`; se descartan los que no
/// existen, los que no tienen coordenadas y los de otra ubicación.
pub fn plan_route_overlays(
    routes: &[Route],
    deliveries: &[Delivery],
    selected_location: &str,
    style: &RouteStyle,
) -> Vec<RouteLayer> {
    routes
        .iter()
        .enumerate()
        .map(|(route_index, route)| {
            let coordinates: Vec<LngLat> = route
                .resolve(deliveries)
                .flatten()
                .filter(|delivery| delivery.customer_location == selected_location)
                .filter_map(Delivery::coordinates)
                .collect();
            RouteLayer::new(route_index, coordinates, style.clone())
        })
        .collect()
}

pub struct MapViewModel<A: DeliveryApi, R: MapRenderer> {
    api: Rc<A>,
    map: Rc<RefCell<Option<R>>>,
    state: ReactiveState<MapViewState>,
    lifetime: ViewLifetime,
    vehicle_count: u32,
    route_style: RouteStyle,
}

impl<A: DeliveryApi, R: MapRenderer> Clone for MapViewModel<A, R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            map: self.map.clone(),
            state: self.state.clone(),
            lifetime: self.lifetime.clone(),
            vehicle_count: self.vehicle_count,
            route_style: self.route_style.clone(),
        }
    }
}

impl<A: DeliveryApi + 'static, R: MapRenderer + 'static> MapViewModel<A, R> {
    pub fn new(api: Rc<A>, config: &AppConfig) -> Self {
        Self {
            api,
            map: Rc::new(RefCell::new(None)),
            state: ReactiveState::new(MapViewState::default()),
            lifetime: ViewLifetime::new(),
            vehicle_count: config.vehicle_count,
            route_style: config.route_style.clone(),
        }
    }

    pub fn state(&self) -> ReactiveState<MapViewState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> MapViewState {
        self.state.get()
    }

    /// Acceso de solo lectura al mapa (None si no está montado)
    pub fn with_map<T>(&self, reader: impl FnOnce(&R) -> T) -> Option<T> {
        self.map.borrow().as_ref().map(reader)
    }

    /// Montaje: adoptar la instancia del mapa y cargar pedidos (una sola vez)
    pub async fn mount(&self, map: R) {
        let ticket = self.lifetime.mount();
        if let Some(mut previous) = self.map.borrow_mut().replace(map) {
            previous.destroy();
        }
        self.state.update(|s| {
            s.load_status = ViewStatus::Loading;
            s.route_status = ViewStatus::Idle;
        });

        let result = self.api.fetch_deliveries().await;
        if !self.lifetime.is_current(ticket) {
            log::warn!("⚠️ [MAP] Pedidos llegaron después de desmontar, descartados");
            return;
        }

        match result {
            Ok(deliveries) => {
                log::info!("📦 [MAP] {} pedidos cargados", deliveries.len());
                self.state.update(|s| {
                    s.deliveries = deliveries;
                    s.load_status = ViewStatus::Ready;
                });
            }
            Err(e) => {
                log::error!("❌ Error fetching deliveries from backend: {}", e);
                self.state.update(|s| s.load_status = ViewStatus::Error(e.message()));
            }
        }
    }

    /// Desmontaje: destruir el mapa e invalidar requests pendientes
    pub fn unmount(&self) {
        self.lifetime.unmount();
        if let Some(mut map) = self.map.borrow_mut().take() {
            map.destroy();
        }
        self.state.clear_subscribers();
    }

    /// Ubicación seleccionada en el panel (vacía = ninguna)
    pub fn set_selected_location(&self, location: &str) {
        let selected = Some(location.to_string()).filter(|l| !l.is_empty());
        self.state.update(|s| s.selected_location = selected);
    }

    /// Callback para pasar al `DeliveryInfoViewModel`
    pub fn selection_callback(&self) -> LocationCallback {
        let vm = self.clone();
        Rc::new(move |location: &str| vm.set_selected_location(location))
    }

    /// "Fetch Routes": pedir rutas optimizadas y redibujar capas y marcadores
    pub async fn fetch_routes(&self) -> FetchRoutesOutcome {
        let selected = match self.state.with(|s| s.selected_location.clone()) {
            Some(location) => location,
            None => {
                log::warn!("⚠️ [MAP] {}", NO_LOCATION_ALERT);
                return FetchRoutesOutcome::NoLocationSelected;
            }
        };
        if self.state.with(|s| s.route_status.is_loading()) {
            log::warn!("⚠️ [MAP] Fetch de rutas en curso, ignorando click");
            return FetchRoutesOutcome::AlreadyLoading;
        }
        if self.map.borrow().is_none() {
            log::warn!("⚠️ [MAP] Mapa no disponible, no se piden rutas");
            self.state.update(|s| s.route_status = ViewStatus::Idle);
            return FetchRoutesOutcome::MapUnavailable;
        }

        let ticket = self.lifetime.ticket();
        self.state.update(|s| s.route_status = ViewStatus::Loading);

        let result = self.api.fetch_optimized_routes(self.vehicle_count).await;
        if !self.lifetime.is_current(ticket) {
            log::warn!("⚠️ [MAP] Rutas llegaron después de desmontar, descartadas");
            return FetchRoutesOutcome::Discarded;
        }

        let routes = match result {
            Ok(routes) => routes,
            Err(e) => {
                log::error!("❌ Error fetching optimized routes: {}", e);
                let message = e.message();
                self.state.update(|s| s.route_status = ViewStatus::Error(message.clone()));
                return FetchRoutesOutcome::Failed(message);
            }
        };

        let (deliveries, previously_drawn) =
            self.state.with(|s| (s.deliveries.clone(), s.drawn_layers));
        let layers = plan_route_overlays(&routes, &deliveries, &selected, &self.route_style);
        let clear_upto = deliveries.len().max(previously_drawn);

        match self.redraw(&layers, clear_upto) {
            Ok(markers) => {
                log::info!(
                    "✅ [MAP] {} rutas dibujadas, {} marcadores para {:?}",
                    layers.len(),
                    markers,
                    selected
                );
                self.state.update(|s| {
                    s.drawn_layers = layers.len();
                    s.marker_count = markers;
                    s.route_status = ViewStatus::Ready;
                });
                FetchRoutesOutcome::Drawn { layers: layers.len(), markers }
            }
            Err(e) => {
                // Sin rollback: lo ya dibujado queda en el mapa
                log::error!("❌ Error fetching optimized routes: {}", e);
                let message = e.to_string();
                let markers = self.with_map(R::marker_count).unwrap_or(0);
                self.state.update(|s| {
                    s.drawn_layers = layers.len().max(previously_drawn);
                    s.marker_count = markers;
                    s.route_status = ViewStatus::Error(message.clone());
                });
                FetchRoutesOutcome::Failed(message)
            }
        }
    }

    /// Limpiar capas `route-0..clear_upto` y marcadores, luego dibujar `layers`
    fn redraw(&self, layers: &[RouteLayer], clear_upto: usize) -> Result<usize, MapError> {
        let mut guard = self.map.borrow_mut();
        let map = guard.as_mut().ok_or(MapError::NotReady)?;

        for index in 0..clear_upto {
            let layer_id = RouteLayer::layer_id(index);
            if map.has_layer(&layer_id) {
                map.remove_layer(&layer_id)?;
            }
        }
        map.clear_markers()?;

        for layer in layers {
            map.add_route_layer(layer)?;
            for point in &layer.coordinates {
                map.add_marker(*point)?;
            }
        }

        Ok(map.marker_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use crate::error::ApiError;
    use crate::models::OrderPriority;
    use crate::testing::{ApiCall, FakeDeliveryApi, RecordingMapRenderer};

    type Vm = MapViewModel<FakeDeliveryApi, RecordingMapRenderer>;

    fn mounted(api: Rc<FakeDeliveryApi>) -> Vm {
        let vm = MapViewModel::new(api, &AppConfig::default());
        block_on(vm.mount(RecordingMapRenderer::default()));
        vm
    }

    fn mixed_deliveries() -> Vec<Delivery> {
        vec![
            Delivery::new("ORD001", "Depot", 17.43, 78.50, OrderPriority::Medium),
            Delivery::new("ORD002", "A", 10.0, 20.0, OrderPriority::High),
            Delivery::new("ORD003", "B", 11.0, 21.0, OrderPriority::Low),
            Delivery::new("ORD004", "A", 12.0, 22.0, OrderPriority::Low),
        ]
    }

    #[test]
    fn single_delivery_scenario() {
        let api = FakeDeliveryApi::with_deliveries(vec![Delivery::new(
            "1",
            "A",
            10.0,
            20.0,
            OrderPriority::High,
        )]);
        api.set_routes(Ok(vec![vec![0]]));
        let vm = mounted(api);
        vm.set_selected_location("A");

        let outcome = block_on(vm.fetch_routes());

        assert_eq!(outcome, FetchRoutesOutcome::Drawn { layers: 1, markers: 1 });
        vm.with_map(|map| {
            let layer = map.layer("route-0").unwrap();
            assert_eq!(layer.coordinates, vec![LngLat::new(20.0, 10.0)]);
            assert_eq!(map.markers, vec![LngLat::new(20.0, 10.0)]);
            assert_eq!(map.layers.len(), 1);
        });
    }

    #[test]
    fn no_location_means_no_network_call() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        let vm = mounted(api.clone());

        let outcome = block_on(vm.fetch_routes());

        assert_eq!(outcome, FetchRoutesOutcome::NoLocationSelected);
        assert_eq!(api.count(|c| matches!(c, ApiCall::Optimize { .. })), 0);
        assert_eq!(vm.snapshot().route_status, ViewStatus::Idle);
    }

    #[test]
    fn empty_selection_counts_as_none() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        let vm = mounted(api.clone());
        vm.set_selected_location("A");
        vm.set_selected_location("");

        assert_eq!(block_on(vm.fetch_routes()), FetchRoutesOutcome::NoLocationSelected);
        assert_eq!(api.count(|c| matches!(c, ApiCall::Optimize { .. })), 0);
    }

    #[test]
    fn markers_only_for_selected_location() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        api.set_routes(Ok(vec![vec![0, 1, 2, 0], vec![0, 3, 9, -4, 0]]));
        let vm = mounted(api.clone());
        vm.set_selected_location("A");

        let outcome = block_on(vm.fetch_routes());

        assert_eq!(outcome, FetchRoutesOutcome::Drawn { layers: 2, markers: 2 });
        assert!(api.calls().contains(&ApiCall::Optimize { vehicle_count: 2 }));
        vm.with_map(|map| {
            assert_eq!(map.layer("route-0").unwrap().coordinates, vec![LngLat::new(20.0, 10.0)]);
            assert_eq!(map.layer("route-1").unwrap().coordinates, vec![LngLat::new(22.0, 12.0)]);
        });
    }

    #[test]
    fn rerun_replaces_instead_of_accumulating() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        api.set_routes(Ok(vec![vec![1, 3], vec![1], vec![3]]));
        let vm = mounted(api.clone());
        vm.set_selected_location("A");

        block_on(vm.fetch_routes());
        vm.with_map(|map| {
            assert_eq!(map.layers.len(), 3);
            assert_eq!(map.markers.len(), 4);
        });

        api.set_routes(Ok(vec![vec![1]]));
        let outcome = block_on(vm.fetch_routes());

        assert_eq!(outcome, FetchRoutesOutcome::Drawn { layers: 1, markers: 1 });
        vm.with_map(|map| {
            assert_eq!(map.layers.keys().collect::<Vec<_>>(), vec!["route-0"]);
            assert_eq!(map.markers.len(), 1);
            assert_eq!(map.removed_layers, vec!["route-0", "route-1", "route-2"]);
        });
    }

    #[test]
    fn more_routes_than_deliveries_are_still_cleared() {
        let api = FakeDeliveryApi::with_deliveries(vec![Delivery::new(
            "1",
            "A",
            10.0,
            20.0,
            OrderPriority::High,
        )]);
        api.set_routes(Ok(vec![vec![0], vec![0], vec![0]]));
        let vm = mounted(api.clone());
        vm.set_selected_location("A");

        block_on(vm.fetch_routes());
        let outcome = block_on(vm.fetch_routes());

        assert_eq!(outcome, FetchRoutesOutcome::Drawn { layers: 3, markers: 3 });
        vm.with_map(|map| assert_eq!(map.layers.len(), 3));
    }

    #[test]
    fn backend_failure_clears_loading_and_keeps_drawn_layers() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        api.set_routes(Ok(vec![vec![1]]));
        let vm = mounted(api.clone());
        vm.set_selected_location("A");
        block_on(vm.fetch_routes());

        api.set_routes(Err(ApiError::Backend("Too many locations".to_string())));
        let outcome = block_on(vm.fetch_routes());

        assert!(matches!(outcome, FetchRoutesOutcome::Failed(ref m) if m.contains("Too many locations")));
        let state = vm.snapshot();
        assert!(!state.route_status.is_loading());
        assert_eq!(state.button_label(), "Fetch Routes");
        vm.with_map(|map| assert!(map.has_layer("route-0")));
    }

    #[test]
    fn draw_failure_has_no_rollback() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        api.set_routes(Ok(vec![vec![1], vec![3]]));
        let vm = MapViewModel::new(api, &AppConfig::default());
        let map = RecordingMapRenderer {
            fail_on_layer: Some("route-1".to_string()),
            ..Default::default()
        };
        block_on(vm.mount(map));
        vm.set_selected_location("A");

        let outcome = block_on(vm.fetch_routes());

        assert!(matches!(outcome, FetchRoutesOutcome::Failed(_)));
        vm.with_map(|map| {
            assert!(map.has_layer("route-0"));
            assert!(!map.has_layer("route-1"));
        });
        let state = vm.snapshot();
        assert_eq!(state.drawn_layers, 2);
        assert!(state.route_status.error().is_some());
    }

    #[test]
    fn late_routes_after_unmount_are_discarded() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        api.set_routes(Ok(vec![vec![1]]));
        let vm = mounted(api.clone());
        vm.set_selected_location("A");
        {
            let vm = vm.clone();
            *api.before_response.borrow_mut() = Some(Box::new(move || vm.unmount()));
        }

        let outcome = block_on(vm.fetch_routes());

        assert_eq!(outcome, FetchRoutesOutcome::Discarded);
        assert!(vm.with_map(|_| ()).is_none());
    }

    #[test]
    fn loading_guard_blocks_second_fetch() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        let vm = mounted(api.clone());
        vm.set_selected_location("A");
        vm.state().update(|s| s.route_status = ViewStatus::Loading);

        assert_eq!(block_on(vm.fetch_routes()), FetchRoutesOutcome::AlreadyLoading);
        assert_eq!(vm.snapshot().button_label(), "Loading Routes");
        assert_eq!(api.count(|c| matches!(c, ApiCall::Optimize { .. })), 0);
    }

    #[test]
    fn fetch_without_map_does_not_stick_loading() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        let vm: Vm = MapViewModel::new(api.clone(), &AppConfig::default());
        vm.set_selected_location("A");

        assert_eq!(block_on(vm.fetch_routes()), FetchRoutesOutcome::MapUnavailable);
        assert_eq!(block_on(vm.fetch_routes()), FetchRoutesOutcome::MapUnavailable);

        let state = vm.snapshot();
        assert!(!state.route_status.is_loading());
        assert_eq!(state.button_label(), "Fetch Routes");
        assert_eq!(api.count(|c| matches!(c, ApiCall::Optimize { .. })), 0);
    }

    #[test]
    fn remount_clears_stale_loading() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        api.set_routes(Ok(vec![vec![1]]));
        let vm = mounted(api.clone());
        vm.set_selected_location("A");
        {
            let vm = vm.clone();
            *api.before_response.borrow_mut() = Some(Box::new(move || vm.unmount()));
        }
        assert_eq!(block_on(vm.fetch_routes()), FetchRoutesOutcome::Discarded);
        *api.before_response.borrow_mut() = None;

        block_on(vm.mount(RecordingMapRenderer::default()));

        assert!(!vm.snapshot().route_status.is_loading());
        assert_eq!(block_on(vm.fetch_routes()), FetchRoutesOutcome::Drawn { layers: 1, markers: 1 });
    }

    #[test]
    fn unmount_destroys_map() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        let vm = mounted(api);
        vm.unmount();
        assert!(vm.with_map(|_| ()).is_none());
    }

    #[test]
    fn selection_callback_updates_map_state() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        let vm = mounted(api);
        let callback = vm.selection_callback();

        callback("B");

        assert_eq!(vm.snapshot().selected_location.as_deref(), Some("B"));
    }

    #[test]
    fn configured_vehicle_count_is_sent() {
        let api = FakeDeliveryApi::with_deliveries(mixed_deliveries());
        let config = AppConfig { vehicle_count: 4, ..AppConfig::default() };
        let vm: Vm = MapViewModel::new(api.clone(), &config);
        block_on(vm.mount(RecordingMapRenderer::default()));
        vm.set_selected_location("A");

        block_on(vm.fetch_routes());

        assert!(api.calls().contains(&ApiCall::Optimize { vehicle_count: 4 }));
    }

    #[test]
    fn plan_skips_deliveries_without_coordinates() {
        let mut no_coords = Delivery::new("X", "A", 0.0, 0.0, OrderPriority::Low);
        no_coords.customer_latitude = None;
        let deliveries = vec![no_coords, Delivery::new("Y", "A", 1.0, 2.0, OrderPriority::Low)];

        let layers = plan_route_overlays(
            &[Route::from(vec![0, 1])],
            &deliveries,
            "A",
            &RouteStyle::default(),
        );

        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].coordinates, vec![LngLat::new(2.0, 1.0)]);
    }
}
