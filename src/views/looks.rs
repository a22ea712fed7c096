// ============================================================================
// LOOKS - look table plus the product ordering panel
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Map;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, clear, fallback_image, on_click, on_drag_start, on_drop, ElementBuilder};
use crate::events::topics::LOOKS;
use crate::events::EventBus;
use crate::models::Look;
use crate::services::{endpoints, ApiClient};
use crate::state::AppState;
use crate::viewmodels::look_products::LookProductsViewModel;
use crate::viewmodels::resource::Resource;
use crate::views::entity::EntitySection;
use crate::views::page::Page;
use crate::views::table::TableOptions;

pub fn render_looks(state: &AppState) -> Result<Page, JsValue> {
    let panel = ElementBuilder::new("div")?.class("look-products").build();

    // The look whose products the panel shows
    let current: Rc<RefCell<Option<LookProductsViewModel>>> = Rc::new(RefCell::new(None));

    let mut options = TableOptions::crud("Looks", LOOKS);
    // Looks are created by creators in the app, not here
    options.can_create = false;
    {
        let panel = panel.clone();
        let api = state.api.clone();
        let bus = state.bus.clone();
        let current = current.clone();
        options.on_open = Some(Rc::new(move |look: &Look| {
            let products = LookProductsViewModel::new(look);
            let previous = current.borrow_mut().replace(products.clone());
            if let Some(previous) = previous {
                previous.detach();
            }
            let title = look.title();
            if let Err(e) = mount_products(&panel, &products, &api, &bus, &title) {
                log::error!("❌ [LOOKS] Product panel failed: {:?}", e);
            }
        }));
    }

    let section = EntitySection::<Look>::mount(state, "", endpoints::looks(), options, Map::new())?;
    let element = ElementBuilder::new("div")?
        .class("looks-page")
        .child(section.element.clone())?
        .child(panel)?
        .build();

    let mut page = Page::new(element);
    section.bind_to(&mut page);
    page.on_dispose(move || {
        if let Some(products) = current.borrow_mut().take() {
            products.detach();
        }
    });
    Ok(page)
}

fn mount_products(
    host: &Element,
    products: &LookProductsViewModel,
    api: &ApiClient,
    bus: &EventBus,
    title: &str,
) -> Result<(), JsValue> {
    paint_products(host, products, api, bus, title)?;

    let host = host.clone();
    let for_paint = products.clone();
    let api = api.clone();
    let bus = bus.clone();
    let title = title.to_string();
    products.subscribe(move || {
        if let Err(e) = paint_products(&host, &for_paint, &api, &bus, &title) {
            log::error!("❌ [LOOKS] Product panel render failed: {:?}", e);
        }
    });
    Ok(())
}

fn paint_products(
    host: &Element,
    products: &LookProductsViewModel,
    api: &ApiClient,
    bus: &EventBus,
    title: &str,
) -> Result<(), JsValue> {
    clear(host);
    let state = products.state();

    let heading = if title.is_empty() {
        "Products".to_string()
    } else {
        format!("Products in {}", title)
    };
    append_child(host, &ElementBuilder::new("h3")?.text(&heading).build())?;

    if state.items.is_empty() {
        append_child(host, &ElementBuilder::new("p")?.class("muted").text("This look has no products").build())?;
        return Ok(());
    }

    let list = ElementBuilder::new("ol")?.class("sortable").build();
    for (index, product) in state.items.iter().enumerate() {
        let mut item = ElementBuilder::new("li")?
            .class(if state.dragging == Some(index) { "sortable-item dragging" } else { "sortable-item" })
            .attr("draggable", "true")?;
        if let Some(src) = product.image_url.as_deref() {
            let img = ElementBuilder::new("img")?.class("thumb").attr("src", src)?.attr("alt", "")?.build();
            fallback_image(&img)?;
            item = item.child(img)?;
        }
        let item = item
            .child(
                ElementBuilder::new("span")?
                    .text(product.name.as_deref().unwrap_or("Unnamed product"))
                    .build(),
            )?
            .build();

        {
            let products = products.clone();
            on_drag_start(&item, move || products.start_drag(index))?;
        }
        {
            let products = products.clone();
            on_drop(&item, move || products.drop_on(index))?;
        }
        append_child(&list, &item)?;
    }
    append_child(host, &list)?;

    let save = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .text(if state.is_processing { "Saving…" } else { "Save order" })
        .flag("disabled", !state.dirty || state.is_processing)?
        .build();
    {
        let products = products.clone();
        let api = api.clone();
        let bus = bus.clone();
        on_click(&save, move |_| products.save(&api, &bus, LOOKS.reload))?;
    }
    append_child(host, &save)
}
