// Brand users only ever see this page: their own campaigns and ads

use wasm_bindgen::prelude::*;

use crate::dom::{append_child, ElementBuilder};
use crate::state::AppState;
use crate::views::brand_detail::mount_brand_sections;
use crate::views::page::Page;

pub fn render_brand_portal(state: &AppState) -> Result<Page, JsValue> {
    let user = state.session.user();
    let heading = user
        .as_ref()
        .map(|user| format!("Welcome, {}", user.display_name()))
        .unwrap_or_else(|| "Brand portal".to_string());

    let element = ElementBuilder::new("div")?
        .class("brand-portal")
        .child(ElementBuilder::new("h2")?.text(&heading).build())?
        .build();
    let mut page = Page::new(element.clone());

    match user.and_then(|user| user.brand_id) {
        Some(brand_id) => {
            append_child(&element, &mount_brand_sections(state, &brand_id, false, &mut page)?)?;
        }
        None => {
            log::warn!("⚠️ [PORTAL] Signed-in user has no brand");
            let notice = ElementBuilder::new("p")?
                .class("banner")
                .text("Your account is not linked to a brand yet.")
                .build();
            append_child(&element, &notice)?;
        }
    }
    Ok(page)
}
