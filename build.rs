use std::env;
use std::fs;
use std::path::Path;

// Claves que `AppConfig::from_env` lee con option_env!
const CONFIG_KEYS: [&str; 10] = [
    "BACKEND_URL",
    "MAPBOX_ACCESS_TOKEN",
    "MAP_STYLE",
    "DEFAULT_MAP_CENTER_LNG",
    "DEFAULT_MAP_CENTER_LAT",
    "DEFAULT_MAP_ZOOM",
    "VEHICLE_COUNT",
    "ROUTE_LINE_COLOR",
    "ROUTE_LINE_WIDTH",
    "ENABLE_LOGGING",
];

fn main() {
    // Recompilar si cambia el entorno de alguna clave
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    let env_file = Path::new(".env");
    if !env_file.exists() {
        println!("cargo:warning=No .env file found. Using default values. Copy .env.example to .env and configure your settings.");
        println!("cargo:rerun-if-changed=build.rs");
        return;
    }
    println!("cargo:rerun-if-changed=.env");

    if let Ok(contents) = fs::read_to_string(env_file) {
        for line in contents.lines() {
            // Ignorar comentarios y líneas vacías
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if !CONFIG_KEYS.contains(&key) {
                println!("cargo:warning=Clave desconocida en .env: {}", key);
                continue;
            }
            // El entorno del proceso tiene prioridad sobre .env
            if env::var(key).is_err() {
                println!("cargo:rustc-env={}={}", key, value);
            }
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env.example");
}
