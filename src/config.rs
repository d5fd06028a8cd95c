// ============================================================================
// CONFIG - Configuración inyectada al arrancar la app
// ============================================================================
// Se construye una sola vez en el entry point y se pasa por referencia a
// servicios, view models y al renderizador del mapa. Sin estado global.
// ============================================================================

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MAP_STYLE: &str = "mapbox://styles/mapbox/streets-v11";
pub const DEFAULT_VEHICLE_COUNT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub mapbox_access_token: String,
    pub enable_logging: bool,
    /// Vehículos pedidos al optimizador en cada "Fetch Routes"
    pub vehicle_count: u32,
    pub map_config: MapConfig,
    pub route_style: RouteStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            mapbox_access_token: String::new(),
            enable_logging: true,
            vehicle_count: DEFAULT_VEHICLE_COUNT,
            map_config: MapConfig::default(),
            route_style: RouteStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub style: String,
    pub default_center_lng: f64,
    pub default_center_lat: f64,
    pub default_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style: DEFAULT_MAP_STYLE.to_string(),
            // Hyderabad
            default_center_lng: 78.486671,
            default_center_lat: 17.385044,
            default_zoom: 5.0,
        }
    }
}

impl MapConfig {
    /// Centro en orden Mapbox: [lng, lat]
    pub fn center(&self) -> [f64; 2] {
        [self.default_center_lng, self.default_center_lat]
    }
}

/// Estilo de las líneas de ruta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub line_color: String,
    pub line_width: f64,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            line_color: "#3b9ddd".to_string(),
            line_width: 4.0,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    /// (build.rs las reenvía desde `.env`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            "BACKEND_URL" => option_env!("BACKEND_URL"),
            "MAPBOX_ACCESS_TOKEN" => option_env!("MAPBOX_ACCESS_TOKEN"),
            "ENABLE_LOGGING" => option_env!("ENABLE_LOGGING"),
            "VEHICLE_COUNT" => option_env!("VEHICLE_COUNT"),
            "MAP_STYLE" => option_env!("MAP_STYLE"),
            "DEFAULT_MAP_CENTER_LNG" => option_env!("DEFAULT_MAP_CENTER_LNG"),
            "DEFAULT_MAP_CENTER_LAT" => option_env!("DEFAULT_MAP_CENTER_LAT"),
            "DEFAULT_MAP_ZOOM" => option_env!("DEFAULT_MAP_ZOOM"),
            "ROUTE_LINE_COLOR" => option_env!("ROUTE_LINE_COLOR"),
            "ROUTE_LINE_WIDTH" => option_env!("ROUTE_LINE_WIDTH"),
            _ => None,
        })
    }

    /// Construye la config a partir de una función de búsqueda de claves.
    /// Valores ausentes o no parseables caen al default.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let defaults = Self::default();
        let text = |key: &str, fallback: &str| {
            lookup(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());

        let vehicle_count = lookup("VEHICLE_COUNT")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|count| *count > 0)
            .unwrap_or(defaults.vehicle_count);

        Self {
            backend_url: text("BACKEND_URL", &defaults.backend_url)
                .trim_end_matches('/')
                .to_string(),
            mapbox_access_token: text("MAPBOX_ACCESS_TOKEN", ""),
            enable_logging: lookup("ENABLE_LOGGING")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.enable_logging),
            vehicle_count,
            map_config: MapConfig {
                style: text("MAP_STYLE", &defaults.map_config.style),
                default_center_lng: parsed("DEFAULT_MAP_CENTER_LNG")
                    .unwrap_or(defaults.map_config.default_center_lng),
                default_center_lat: parsed("DEFAULT_MAP_CENTER_LAT")
                    .unwrap_or(defaults.map_config.default_center_lat),
                default_zoom: parsed("DEFAULT_MAP_ZOOM")
                    .unwrap_or(defaults.map_config.default_zoom),
            },
            route_style: RouteStyle {
                line_color: text("ROUTE_LINE_COLOR", &defaults.route_style.line_color),
                line_width: parsed("ROUTE_LINE_WIDTH")
                    .filter(|w| *w > 0.0)
                    .unwrap_or(defaults.route_style.line_width),
            },
        }
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Nivel máximo de log según la configuración
    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Debug
        } else {
            log::Level::Warn
        }
    }

    /// Obtiene el token de Mapbox
    pub fn mapbox_token(&self) -> &str {
        &self.mapbox_access_token
    }

    /// URL absoluta de un endpoint del backend
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}
