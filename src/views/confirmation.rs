// ============================================================================
// CONFIRMATION VIEW - delete prompt for a ConfirmationController
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, clear, on_click, ElementBuilder};
use crate::services::ApiClient;
use crate::viewmodels::controller::ConfirmationController;
use crate::viewmodels::resource::Resource;

pub fn render_confirmation<R: Resource>(confirm: &ConfirmationController<R>, api: &ApiClient) -> Result<Element, JsValue> {
    let host = ElementBuilder::new("div")?.class("modal-host").build();
    paint(confirm, api, &host)?;

    let for_paint = confirm.clone();
    let api = api.clone();
    let target = host.clone();
    confirm.subscribe(move || {
        if let Err(e) = paint(&for_paint, &api, &target) {
            log::error!("❌ [CONFIRM] Render failed: {:?}", e);
        }
    });
    Ok(host)
}

fn paint<R: Resource>(confirm: &ConfirmationController<R>, api: &ApiClient, host: &Element) -> Result<(), JsValue> {
    clear(host);
    let state = confirm.state();
    let Some(record) = state.record.as_ref().filter(|_| state.open) else {
        return Ok(());
    };

    let name = record.title();
    let question = if name.is_empty() {
        format!("Delete this {}?", R::LABEL.to_lowercase())
    } else {
        format!("Delete {} \"{}\"?", R::LABEL.to_lowercase(), name)
    };

    let cancel = ElementBuilder::new("button")?
        .class("btn")
        .text("Cancel")
        .flag("disabled", state.is_processing)?
        .build();
    {
        let confirm = confirm.clone();
        on_click(&cancel, move |_| confirm.close())?;
    }

    let delete = ElementBuilder::new("button")?
        .class("btn btn-danger")
        .text(if state.is_processing { "Deleting…" } else { "Delete" })
        .flag("disabled", state.is_processing)?
        .build();
    {
        let confirm = confirm.clone();
        let api = api.clone();
        on_click(&delete, move |_| confirm.confirm(&api))?;
    }

    let mut dialog = ElementBuilder::new("div")?
        .class("modal")
        .attr("role", "dialog")?
        .child(ElementBuilder::new("h3")?.text(&question).build())?
        .child(ElementBuilder::new("p")?.text("This cannot be undone.").build())?;
    if let Some(error) = &state.error {
        dialog = dialog.child(ElementBuilder::new("p")?.class("form-error").text(error).build())?;
    }
    let dialog = dialog
        .child(ElementBuilder::new("div")?.class("modal-actions").children([cancel, delete])?.build())?
        .build();

    append_child(host, &ElementBuilder::new("div")?.class("backdrop").build())?;
    append_child(host, &dialog)
}
