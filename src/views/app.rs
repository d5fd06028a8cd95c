// ============================================================================
// APP VIEW - Shell principal
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::ElementBuilder;

pub const APP_TITLE: &str = "📦 Logistics Delivery System";

/// Shell: título + hueco para el contenido
pub fn render_app(content: Element) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("app")
        .child(ElementBuilder::new("h1")?.class("app-title").text(APP_TITLE).build())?
        .child(content)?
        .build())
}
