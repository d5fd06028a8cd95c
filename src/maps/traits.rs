use serde_json::{json, Value};
use thiserror::Error;
use crate::config::RouteStyle;
use crate::models::LngLat;

/// Trait común para renderizadores de mapas
///
/// El navegador usa `WebMapRenderer` (Mapbox GL JS); los tests usan un
/// renderizador que solo registra las operaciones.
pub trait MapRenderer {
    /// ¿Existe ya una capa con este id?
    fn has_layer(&self, layer_id: &str) -> bool;

    /// Remover una capa (y su fuente GeoJSON)
    fn remove_layer(&mut self, layer_id: &str) -> Result<(), MapError>;

    /// Dibujar una ruta como capa de línea
    fn add_route_layer(&mut self, layer: &RouteLayer) -> Result<(), MapError>;

    /// Agregar un marcador en una coordenada
    fn add_marker(&mut self, position: LngLat) -> Result<(), MapError>;

    /// Limpiar todos los marcadores
    fn clear_markers(&mut self) -> Result<(), MapError>;

    fn marker_count(&self) -> usize;

    /// Liberar la instancia del mapa
    fn destroy(&mut self);
}

/// Capa de línea de una ruta, lista para pasar a Mapbox
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    pub id: String,
    pub coordinates: Vec<LngLat>,
    pub style: RouteStyle,
}

impl RouteLayer {
    /// Id de la capa para la ruta `index`: `route-{index}`
    pub fn layer_id(index: usize) -> String {
        format!("route-{}", index)
    }

    pub fn new(index: usize, coordinates: Vec<LngLat>, style: RouteStyle) -> Self {
        Self {
            id: Self::layer_id(index),
            coordinates,
            style,
        }
    }

    /// Feature GeoJSON (LineString)
    pub fn geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": self.coordinates,
            },
        })
    }

    /// Especificación de capa de Mapbox con fuente GeoJSON embebida
    pub fn to_mapbox_layer(&self) -> Value {
        json!({
            "id": self.id,
            "type": "line",
            "source": {
                "type": "geojson",
                "data": self.geojson(),
            },
            "layout": {
                "line-join": "round",
                "line-cap": "round",
            },
            "paint": {
                "line-color": self.style.line_color,
                "line-width": self.style.line_width,
            },
        })
    }
}

/// Error del mapa
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("Map is not ready")]
    NotReady,
    #[error("Invalid coordinates: [{lng}, {lat}]")]
    InvalidCoordinates { lng: f64, lat: f64 },
    #[error("Mapbox error: {0}")]
    Js(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_spec_has_round_joins_and_style() {
        let layer = RouteLayer::new(0, vec![LngLat::new(20.0, 10.0)], RouteStyle::default());
        let spec = layer.to_mapbox_layer();

        assert_eq!(spec["id"], "route-0");
        assert_eq!(spec["type"], "line");
        assert_eq!(spec["layout"]["line-join"], "round");
        assert_eq!(spec["layout"]["line-cap"], "round");
        assert_eq!(spec["paint"]["line-color"], "#3b9ddd");
        assert_eq!(spec["paint"]["line-width"], 4.0);
        assert_eq!(spec["source"]["type"], "geojson");
        assert_eq!(
            spec["source"]["data"]["geometry"],
            json!({"type": "LineString", "coordinates": [[20.0, 10.0]]})
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(MapError::NotReady.to_string(), "Map is not ready");
        assert_eq!(
            MapError::InvalidCoordinates { lng: f64::NAN, lat: 1.0 }.to_string(),
            "Invalid coordinates: [NaN, 1]"
        );
    }
}
