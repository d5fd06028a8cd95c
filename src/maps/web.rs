use wasm_bindgen::JsValue;
use crate::config::{AppConfig, MapConfig};
use crate::models::LngLat;
use crate::utils::mapbox_ffi::{self, MapboxMap, Marker};
use super::{MapError, MapRenderer, RouteLayer};

/// Renderizador de mapas para web usando Mapbox GL JS
pub struct WebMapRenderer {
    map: Option<MapboxMap>,
    markers: Vec<Marker>,
}

impl WebMapRenderer {
    /// Crear el mapa dentro del contenedor `container_id`
    pub fn create(container_id: &str, config: &AppConfig) -> Result<Self, MapError> {
        log::info!("🗺️ Inicializando Mapbox GL JS en #{}...", container_id);

        mapbox_ffi::set_access_token(config.mapbox_token()).map_err(js_error)?;
        let options = map_options(container_id, &config.map_config);
        let options = mapbox_ffi::to_js_object(&options).map_err(js_error)?;
        let map = MapboxMap::new(&options).map_err(js_error)?;

        log::info!("✅ Mapa web inicializado correctamente");
        Ok(Self {
            map: Some(map),
            markers: Vec::new(),
        })
    }

    fn map(&self) -> Result<&MapboxMap, MapError> {
        self.map.as_ref().ok_or(MapError::NotReady)
    }
}

fn map_options(container_id: &str, config: &MapConfig) -> serde_json::Value {
    serde_json::json!({
        "container": container_id,
        "style": config.style,
        "center": config.center(),
        "zoom": config.default_zoom,
    })
}

fn js_error(value: JsValue) -> MapError {
    MapError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl MapRenderer for WebMapRenderer {
    fn has_layer(&self, layer_id: &str) -> bool {
        self.map
            .as_ref()
            .map(|map| !map.get_layer(layer_id).is_undefined())
            .unwrap_or(false)
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<(), MapError> {
        let map = self.map()?;
        map.remove_layer(layer_id).map_err(js_error)?;
        // addLayer con fuente embebida crea una fuente con el mismo id
        if !map.get_source(layer_id).is_undefined() {
            map.remove_source(layer_id).map_err(js_error)?;
        }
        log::debug!("🗑️ Capa {} removida", layer_id);
        Ok(())
    }

    fn add_route_layer(&mut self, layer: &RouteLayer) -> Result<(), MapError> {
        let spec = mapbox_ffi::to_js_object(&layer.to_mapbox_layer()).map_err(js_error)?;
        self.map()?.add_layer(&spec).map_err(js_error)?;
        log::info!("🛣️ Capa {} dibujada ({} puntos)", layer.id, layer.coordinates.len());
        Ok(())
    }

    fn add_marker(&mut self, position: LngLat) -> Result<(), MapError> {
        if !position.is_finite() {
            return Err(MapError::InvalidCoordinates { lng: position.lng, lat: position.lat });
        }
        let map = self.map()?;
        let lng_lat = js_sys::Array::of2(&JsValue::from_f64(position.lng), &JsValue::from_f64(position.lat));
        let marker = Marker::new().set_lng_lat(&lng_lat).add_to(map);
        self.markers.push(marker);
        Ok(())
    }

    fn clear_markers(&mut self) -> Result<(), MapError> {
        let count = self.markers.len();
        for marker in self.markers.drain(..) {
            marker.remove();
        }
        log::debug!("🧹 {} marcadores limpiados", count);
        Ok(())
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn destroy(&mut self) {
        let _ = self.clear_markers();
        if let Some(map) = self.map.take() {
            map.remove();
            log::info!("🗺️ Mapa destruido");
        }
    }
}

impl Drop for WebMapRenderer {
    fn drop(&mut self) {
        self.destroy();
    }
}
