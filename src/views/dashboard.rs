// ============================================================================
// DASHBOARD VIEW - Tabla de pedidos + "Retrain Model"
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, clear_children, on_click, ElementBuilder};
use crate::models::Delivery;
use crate::services::ApiClient;
use crate::viewmodels::DashboardViewModel;

const COLUMNS: [&str; 3] = ["Order ID", "Customer Location", "Priority"];

pub fn render_dashboard(
    container: &Element,
    vm: &DashboardViewModel<ApiClient>,
) -> Result<(), JsValue> {
    let state = vm.snapshot();
    clear_children(container);

    let retrain_button = ElementBuilder::new("button")?
        .class("retrain-button")
        .attr("type", "button")?
        .flag("disabled", state.retrain_status.is_loading())?
        .text("Retrain Model")
        .build();
    {
        let vm = vm.clone();
        on_click(&retrain_button, move |_| {
            let vm = vm.clone();
            wasm_bindgen_futures::spawn_local(async move {
                vm.retrain().await;
            });
        })?;
    }

    let root = ElementBuilder::new("div")?
        .class("dashboard")
        .child(ElementBuilder::new("h1")?.text("Dashboard").build())?
        .child(retrain_button)?
        .build();

    if let Some(message) = &state.message {
        append_child(&root, &ElementBuilder::new("p")?.class("retrain-message").text(message).build())?;
    }

    append_child(&root, &render_table(&state.deliveries)?)?;
    append_child(container, &root)
}

fn render_table(deliveries: &[Delivery]) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("tr")?.build();
    for column in COLUMNS {
        append_child(&header, &ElementBuilder::new("th")?.text(column).build())?;
    }

    let body = ElementBuilder::new("tbody")?.build();
    for delivery in deliveries {
        let row = ElementBuilder::new("tr")?
            .child(cell(&delivery.order_id)?)?
            .child(cell(&delivery.customer_location)?)?
            .child(cell(delivery.order_priority.as_str())?)?
            .build();
        append_child(&body, &row)?;
    }

    Ok(ElementBuilder::new("table")?
        .class("deliveries-table")
        .child(ElementBuilder::new("thead")?.child(header)?.build())?
        .child(body)?
        .build())
}

fn cell(text: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("td")?.text(text).build())
}
