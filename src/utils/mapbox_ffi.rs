// ============================================================================
// MAPBOX FFI - Foreign Function Interface para Mapbox GL JS
// ============================================================================
// Solo bindings a `mapboxgl.Map` / `mapboxgl.Marker` - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `mapboxgl.Map`
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map", catch)]
    pub fn new(options: &JsValue) -> Result<MapboxMap, JsValue>;

    #[wasm_bindgen(method, js_name = getLayer)]
    pub fn get_layer(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = getSource)]
    pub fn get_source(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = addLayer, catch)]
    pub fn add_layer(this: &MapboxMap, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = removeLayer, catch)]
    pub fn remove_layer(this: &MapboxMap, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = removeSource, catch)]
    pub fn remove_source(this: &MapboxMap, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = remove)]
    pub fn remove(this: &MapboxMap);

    /// `mapboxgl.Marker`
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Marker)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Marker")]
    pub fn new() -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Marker, map: &MapboxMap) -> Marker;

    #[wasm_bindgen(method, js_name = remove)]
    pub fn remove(this: &Marker) -> Marker;
}

/// Helper: Establecer `mapboxgl.accessToken` (antes de crear el mapa)
pub fn set_access_token(token: &str) -> Result<(), JsValue> {
    let mapboxgl = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
    if mapboxgl.is_undefined() {
        return Err(JsValue::from_str("mapboxgl is not loaded"));
    }
    js_sys::Reflect::set(&mapboxgl, &JsValue::from_str("accessToken"), &JsValue::from_str(token))?;
    Ok(())
}

/// Helper: serde_json::Value → objeto JS plano
pub fn to_js_object(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    js_sys::JSON::parse(&value.to_string())
}
