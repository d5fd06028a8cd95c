use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Prioridad de un pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderPriority {
    High,
    #[default]
    Medium,
    Low,
    /// Valor desconocido enviado por el backend
    #[serde(other)]
    Unknown,
}

impl OrderPriority {
    /// Opciones del selector, en el orden en que se muestran
    pub const SELECTABLE: [OrderPriority; 3] =
        [OrderPriority::High, OrderPriority::Medium, OrderPriority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPriority::High => "High",
            OrderPriority::Medium => "Medium",
            OrderPriority::Low => "Low",
            OrderPriority::Unknown => "Unknown",
        }
    }

    /// Parsear desde el valor de un `<select>`
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "High" => Some(OrderPriority::High),
            "Medium" => Some(OrderPriority::Medium),
            "Low" => Some(OrderPriority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for OrderPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Par de coordenadas en orden Mapbox/GeoJSON: `[lng, lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(point: LngLat) -> Self {
        [point.lng, point.lat]
    }
}

/// Pedido tal como lo devuelve `GET /deliveries` (una fila de la tabla `deliveries`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(deserialize_with = "deserialize_order_id")]
    pub order_id: String,
    pub customer_location: String,
    #[serde(default)]
    pub customer_latitude: Option<f64>,
    #[serde(default)]
    pub customer_longitude: Option<f64>,
    #[serde(default)]
    pub order_priority: OrderPriority,

    // Columnas extra de la fila (no se usan en la UI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub euclidean_distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Delivery {
    /// Pedido mínimo (demo / tests)
    pub fn new(
        order_id: impl Into<String>,
        customer_location: impl Into<String>,
        latitude: f64,
        longitude: f64,
        order_priority: OrderPriority,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            customer_location: customer_location.into(),
            customer_latitude: Some(latitude),
            customer_longitude: Some(longitude),
            order_priority,
            id: None,
            start_location: None,
            start_latitude: None,
            start_longitude: None,
            euclidean_distance_km: None,
            delivery_time: None,
            vehicle_id: None,
            created_at: None,
        }
    }

    /// Coordenadas del cliente, solo si ambas existen y son finitas
    pub fn coordinates(&self) -> Option<LngLat> {
        match (self.customer_longitude, self.customer_latitude) {
            (Some(lng), Some(lat)) => Some(LngLat::new(lng, lat)).filter(LngLat::is_finite),
            _ => None,
        }
    }
}

/// Ubicaciones distintas, en orden de primera aparición
pub fn distinct_locations(deliveries: &[Delivery]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    deliveries
        .iter()
        .filter(|d| seen.insert(d.customer_location.as_str()))
        .map(|d| d.customer_location.clone())
        .collect()
}

// El backend guarda order_id como TEXT ("ORD001"), pero se acepta también un entero
fn deserialize_order_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OrderIdRepr {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match OrderIdRepr::deserialize(deserializer)? {
        OrderIdRepr::Text(text) => text,
        OrderIdRepr::Integer(n) => n.to_string(),
        OrderIdRepr::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_row() {
        let json = r#"{
            "id": 3,
            "order_id": "ORD003",
            "start_location": "Secunderabad Junction, India",
            "customer_location": "Mumbai CST, India",
            "start_latitude": 17.43,
            "start_longitude": 78.50,
            "customer_latitude": 18.94,
            "customer_longitude": 72.83,
            "euclidean_distance_km": 631.2,
            "order_priority": "High",
            "delivery_time": 74.5,
            "vehicle_id": "VEH4",
            "created_at": "2025-02-01 10:00:00"
        }"#;

        let delivery: Delivery = serde_json::from_str(json).unwrap();
        assert_eq!(delivery.order_id, "ORD003");
        assert_eq!(delivery.order_priority, OrderPriority::High);
        assert_eq!(delivery.coordinates(), Some(LngLat::new(72.83, 18.94)));
        assert_eq!(delivery.vehicle_id.as_deref(), Some("VEH4"));
    }

    #[test]
    fn numeric_order_id_and_unknown_priority() {
        let json = r#"{"order_id": 1, "customer_location": "A",
                       "customer_latitude": 10, "customer_longitude": 20,
                       "order_priority": "Urgent"}"#;
        let delivery: Delivery = serde_json::from_str(json).unwrap();
        assert_eq!(delivery.order_id, "1");
        assert_eq!(delivery.order_priority, OrderPriority::Unknown);
        assert_eq!(delivery.coordinates(), Some(LngLat::new(20.0, 10.0)));
    }

    #[test]
    fn missing_coordinates_resolve_to_none() {
        let json = r#"{"order_id": "ORD9", "customer_location": "B",
                       "customer_latitude": null, "order_priority": "Low"}"#;
        let delivery: Delivery = serde_json::from_str(json).unwrap();
        assert_eq!(delivery.coordinates(), None);
    }

    #[test]
    fn lng_lat_serializes_as_pair() {
        let json = serde_json::to_string(&LngLat::new(20.0, 10.0)).unwrap();
        assert_eq!(json, "[20.0,10.0]");
    }

    #[test]
    fn distinct_locations_keep_first_seen_order() {
        let deliveries = vec![
            Delivery::new("1", "B", 0.0, 0.0, OrderPriority::High),
            Delivery::new("2", "A", 0.0, 0.0, OrderPriority::Low),
            Delivery::new("3", "B", 1.0, 1.0, OrderPriority::Medium),
        ];
        assert_eq!(distinct_locations(&deliveries), vec!["B", "A"]);
    }

    #[test]
    fn priority_select_values() {
        assert_eq!(OrderPriority::from_value("Low"), Some(OrderPriority::Low));
        assert_eq!(OrderPriority::from_value("Unknown"), None);
        assert_eq!(OrderPriority::default(), OrderPriority::Medium);
    }
}
