// ============================================================================
// BRAND DETAIL - brand header plus members, campaigns and ads
// ============================================================================

use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, clear, fallback_image, on_click, ElementBuilder};
use crate::events::topics::{BRAND_ADS, BRAND_CAMPAIGNS, BRAND_MEMBERS};
use crate::models::{Advertisement, Brand, BrandMember, Campaign};
use crate::router::Route;
use crate::services::endpoints;
use crate::services::resource_service::fetch_record;
use crate::state::AppState;
use crate::views::entity::EntitySection;
use crate::views::page::Page;
use crate::views::table::TableOptions;

fn brand_defaults(brand_id: &str) -> Map<String, Value> {
    let mut defaults = Map::new();
    defaults.insert("brandId".to_string(), Value::String(brand_id.to_string()));
    defaults
}

/// Campaign and ad sections (and members when `with_members`) for one brand
pub fn mount_brand_sections(
    state: &AppState,
    brand_id: &str,
    with_members: bool,
    page: &mut Page,
) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("brand-sections").build();

    if with_members {
        let members = EntitySection::<BrandMember>::mount(
            state,
            "members_",
            endpoints::brand_members(brand_id),
            TableOptions::crud("Members", BRAND_MEMBERS),
            brand_defaults(brand_id),
        )?;
        append_child(&container, &members.element)?;
        members.bind_to(page);
    }

    let campaigns = EntitySection::<Campaign>::mount(
        state,
        "campaigns_",
        endpoints::brand_campaigns(brand_id),
        TableOptions::crud("Campaigns", BRAND_CAMPAIGNS),
        brand_defaults(brand_id),
    )?;
    append_child(&container, &campaigns.element)?;
    campaigns.bind_to(page);

    let ads = EntitySection::<Advertisement>::mount(
        state,
        "ads_",
        endpoints::brand_ads(brand_id),
        TableOptions::crud("Advertisements", BRAND_ADS),
        brand_defaults(brand_id),
    )?;
    append_child(&container, &ads.element)?;
    ads.bind_to(page);

    Ok(container)
}

pub fn render_brand_detail(state: &AppState, brand_id: &str) -> Result<Page, JsValue> {
    let header = ElementBuilder::new("div")?
        .class("brand-header")
        .child(ElementBuilder::new("h2")?.text("Loading brand…").build())?
        .build();

    let back = ElementBuilder::new("button")?.class("btn btn-link").text("‹ All brands").build();
    {
        let router = state.router.clone();
        on_click(&back, move |_| router.navigate(&Route::Brands.path()))?;
    }

    let element = ElementBuilder::new("div")?
        .class("brand-detail")
        .child(back)?
        .child(header.clone())?
        .build();
    let mut page = Page::new(element.clone());
    append_child(&element, &mount_brand_sections(state, brand_id, true, &mut page)?)?;

    let api = state.api.clone();
    let endpoint = endpoints::brands().item(brand_id);
    spawn_local(async move {
        match fetch_record::<Brand>(&api, endpoint).await {
            Ok(brand) => {
                if let Err(e) = paint_header(&header, &brand) {
                    log::error!("❌ [BRAND] Header render failed: {:?}", e);
                }
            }
            Err(error) => {
                log::warn!("⚠️ [BRAND] Could not load brand: {}", error);
                header.set_text_content(Some(error.user_message().as_str()));
            }
        }
    });

    Ok(page)
}

fn paint_header(header: &Element, brand: &Brand) -> Result<(), JsValue> {
    clear(header);
    if let Some(logo) = brand.logo_url.as_deref() {
        let img = ElementBuilder::new("img")?.class("brand-logo").attr("src", logo)?.attr("alt", "")?.build();
        fallback_image(&img)?;
        append_child(header, &img)?;
    }
    let title = ElementBuilder::new("div")?
        .child(ElementBuilder::new("h2")?.text(brand.name.as_deref().unwrap_or("Unnamed brand")).build())?
        .child(
            ElementBuilder::new("p")?
                .class("muted")
                .text(brand.website.as_deref().unwrap_or(""))
                .build(),
        )?
        .build();
    append_child(header, &title)?;
    if let Some(description) = brand.description.as_deref() {
        append_child(header, &ElementBuilder::new("p")?.text(description).build())?;
    }
    Ok(())
}
