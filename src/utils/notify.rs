// Transient toast notifications. Errors from validation and remote calls end
// up here; nothing in the app treats them as fatal.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;

use crate::config::CONFIG;
use crate::dom::{append_child, document, get_element_by_id, ElementBuilder};

const TOAST_HOST_ID: &str = "toasts";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }
}

pub fn notify_success(message: &str) {
    show(ToastKind::Success, message);
}

pub fn notify_error(message: &str) {
    log::warn!("⚠️ [NOTIFY] {}", message);
    show(ToastKind::Error, message);
}

fn show(kind: ToastKind, message: &str) {
    if let Err(e) = try_show(kind, message) {
        log::error!("❌ [NOTIFY] Could not render toast: {:?}", e);
    }
}

fn try_show(kind: ToastKind, message: &str) -> Result<(), JsValue> {
    let host = match get_element_by_id(TOAST_HOST_ID) {
        Some(host) => host,
        None => {
            let body = document()
                .and_then(|doc| doc.body())
                .ok_or_else(|| JsValue::from_str("No document body"))?;
            let host = ElementBuilder::new("div")?
                .class("toast-host")
                .id(TOAST_HOST_ID)?
                .build();
            body.append_child(&host)?;
            host
        }
    };

    let toast = ElementBuilder::new("div")?
        .class(kind.class())
        .attr("role", "status")?
        .text(message)
        .build();
    append_child(&host, &toast)?;

    Timeout::new(CONFIG.timing.toast_duration_ms, move || {
        toast.remove();
    })
    .forget();

    Ok(())
}
