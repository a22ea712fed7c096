// ============================================================================
// SIMPLE PAGES - one entity section each, plus dashboard and 404
// ============================================================================

use std::rc::Rc;

use serde_json::Map;
use wasm_bindgen::prelude::*;

use crate::dom::{on_click, ElementBuilder};
use crate::events::topics::{BRANDS, LOCATIONS, USERS};
use crate::models::{Brand, Location, User};
use crate::router::Route;
use crate::services::endpoints;
use crate::state::AppState;
use crate::viewmodels::resource::Resource;
use crate::views::entity::EntitySection;
use crate::views::page::Page;
use crate::views::table::TableOptions;

fn section_page<R: Resource>(section: EntitySection<R>) -> Page {
    let mut page = Page::new(section.element.clone());
    section.bind_to(&mut page);
    page
}

pub fn render_users(state: &AppState) -> Result<Page, JsValue> {
    let section = EntitySection::<User>::mount(
        state,
        "",
        endpoints::users(),
        TableOptions::crud("Users", USERS),
        Map::new(),
    )?;
    Ok(section_page(section))
}

pub fn render_brands(state: &AppState) -> Result<Page, JsValue> {
    let router = state.router.clone();
    let mut options = TableOptions::crud("Brands", BRANDS);
    options.on_open = Some(Rc::new(move |brand: &Brand| {
        if let Some(id) = brand.id() {
            router.navigate(&Route::BrandDetail(id.to_string()).path());
        }
    }));
    let section = EntitySection::<Brand>::mount(state, "", endpoints::brands(), options, Map::new())?;
    Ok(section_page(section))
}

pub fn render_locations(state: &AppState) -> Result<Page, JsValue> {
    let section = EntitySection::<Location>::mount(
        state,
        "",
        endpoints::locations(),
        TableOptions::crud("Locations", LOCATIONS),
        Map::new(),
    )?;
    Ok(section_page(section))
}

const SHORTCUTS: &[(&str, Route)] = &[
    ("Users", Route::Users),
    ("Brands", Route::Brands),
    ("Locations", Route::Locations),
    ("Looks", Route::Looks),
];

pub fn render_home(state: &AppState) -> Result<Page, JsValue> {
    let name = state
        .session
        .user()
        .map(|user| user.display_name())
        .unwrap_or_else(|| "there".to_string());

    let cards = ElementBuilder::new("div")?.class("cards").build();
    for (label, route) in SHORTCUTS {
        let card = ElementBuilder::new("button")?.class("card").text(label).build();
        let router = state.router.clone();
        let path = route.path();
        on_click(&card, move |_| router.navigate(&path))?;
        cards.append_child(&card)?;
    }

    let element = ElementBuilder::new("div")?
        .class("home")
        .child(ElementBuilder::new("h2")?.text(&format!("Hello, {}", name)).build())?
        .child(ElementBuilder::new("p")?.text("Pick a section to manage.").build())?
        .child(cards)?
        .build();
    Ok(Page::new(element))
}

pub fn render_not_found(path: &str) -> Result<Page, JsValue> {
    let element = ElementBuilder::new("div")?
        .class("not-found")
        .child(ElementBuilder::new("h2")?.text("Page not found").build())?
        .child(ElementBuilder::new("p")?.text(&format!("Nothing lives at {}", path)).build())?
        .build();
    Ok(Page::new(element))
}
