// ============================================================================
// EVENT HANDLING
// ============================================================================
// Listeners on elements are leaked with `closure.forget()`; they go away with
// the element when a page is unmounted. Window listeners must be registered
// once (see Router::listen).
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element, Event, HtmlImageElement, MouseEvent, SubmitEvent};

use crate::config::CONFIG;
use crate::dom::control_value;

fn listen<E, F>(element: &Element, event_type: &str, handler: F) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    element.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    listen(element, "click", handler)
}

/// Fires with the control's current value on every keystroke
pub fn on_input<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String) + 'static,
{
    let target = element.clone();
    listen(element, "input", move |_event: Event| {
        handler(control_value(&target).unwrap_or_default());
    })
}

/// `change` on selects and file inputs
pub fn on_change<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    listen(element, "change", handler)
}

/// Form submit with the browser navigation suppressed
pub fn on_submit<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    listen(element, "submit", move |event: SubmitEvent| {
        event.prevent_default();
        handler();
    })
}

pub fn on_drag_start<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    listen(element, "dragstart", move |event: DragEvent| {
        if let Some(transfer) = event.data_transfer() {
            transfer.set_effect_allowed("move");
        }
        handler();
    })
}

/// Marks `element` as a drop target; `handler` runs on drop
pub fn on_drop<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    listen(element, "dragover", |event: DragEvent| event.prevent_default())?;
    listen(element, "drop", move |event: DragEvent| {
        event.prevent_default();
        handler();
    })
}

/// Swap a broken image for the placeholder, once
pub fn fallback_image(image: &Element) -> Result<(), JsValue> {
    let Some(img) = image.dyn_ref::<HtmlImageElement>().cloned() else {
        return Ok(());
    };
    listen(image, "error", move |_event: Event| {
        let placeholder = CONFIG.placeholder_image_url.as_str();
        if !img.src().ends_with(placeholder) {
            log::debug!("🖼️ [DOM] Image failed, using placeholder: {}", img.src());
            img.set_src(placeholder);
        }
    })
}
