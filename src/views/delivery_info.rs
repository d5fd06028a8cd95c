// ============================================================================
// DELIVERY INFO VIEW - Panel "Predict Delivery Time"
// ============================================================================
// Solo renderiza: toda la lógica vive en DeliveryInfoViewModel.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, clear_children, on_click, on_select_change, option, ElementBuilder};
use crate::models::OrderPriority;
use crate::services::ApiClient;
use crate::viewmodels::{DeliveryInfoState, DeliveryInfoViewModel};

/// Re-renderizar el panel completo dentro de `container`
pub fn render_delivery_info(
    container: &Element,
    vm: &DeliveryInfoViewModel<ApiClient>,
) -> Result<(), JsValue> {
    let state = vm.snapshot();
    clear_children(container);

    let panel = ElementBuilder::new("div")?
        .class("delivery-info")
        .child(ElementBuilder::new("h2")?.text("Predict Delivery Time").build())?
        .child(render_priority_select(vm, &state)?)?
        .child(render_location_select(vm, &state)?)?
        .child(render_predict_button(vm, &state)?)?
        .build();

    if let Some(text) = state.prediction.text() {
        let class = if state.prediction_status.error().is_some() {
            "prediction prediction-error"
        } else {
            "prediction"
        };
        append_child(&panel, &ElementBuilder::new("p")?.class(class).text(&text).build())?;
    }

    append_child(container, &panel)
}

fn render_priority_select(
    vm: &DeliveryInfoViewModel<ApiClient>,
    state: &DeliveryInfoState,
) -> Result<Element, JsValue> {
    let select = ElementBuilder::new("select")?
        .class("priority-select")
        .attr("name", "order_priority")?
        .build();
    for priority in OrderPriority::SELECTABLE {
        append_child(
            &select,
            &option(priority.as_str(), priority.as_str(), priority == state.order_priority)?,
        )?;
    }

    let vm = vm.clone();
    on_select_change(&select, move |value| match OrderPriority::from_value(&value) {
        Some(priority) => vm.set_priority(priority),
        None => log::warn!("⚠️ [INFO] Prioridad desconocida: {}", value),
    })?;

    labelled("Order Priority:", select)
}

fn render_location_select(
    vm: &DeliveryInfoViewModel<ApiClient>,
    state: &DeliveryInfoState,
) -> Result<Element, JsValue> {
    let select = ElementBuilder::new("select")?
        .class("location-select")
        .attr("name", "customer_location")?
        .build();
    for location in state.location_options() {
        append_child(
            &select,
            &option(&location, &location, location == state.customer_location)?,
        )?;
    }

    let vm = vm.clone();
    on_select_change(&select, move |value| vm.set_location(&value))?;

    labelled("Customer Location:", select)
}

fn render_predict_button(
    vm: &DeliveryInfoViewModel<ApiClient>,
    state: &DeliveryInfoState,
) -> Result<Element, JsValue> {
    let button = ElementBuilder::new("button")?
        .class("predict-button")
        .attr("type", "button")?
        .flag("disabled", state.prediction_status.is_loading())?
        .text("Predict Time")
        .build();

    let vm = vm.clone();
    on_click(&button, move |_| {
        let vm = vm.clone();
        wasm_bindgen_futures::spawn_local(async move {
            vm.predict().await;
        });
    })?;

    Ok(button)
}

fn labelled(text: &str, control: Element) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("label")?
        .class("field")
        .child(ElementBuilder::new("span")?.text(text).build())?
        .child(control)?
        .build())
}
