// ============================================================================
// TABLE VIEW - search box, rows and pagination for one ListViewModel
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{
    append_child, clear, control_value, fallback_image, on_change, on_click, on_input, ElementBuilder,
};
use crate::events::topics::NEW_RECORD;
use crate::events::{EventBus, TopicSet};
use crate::viewmodels::list_viewmodel::{ListState, ListStatus, ListViewModel};
use crate::viewmodels::resource::Resource;

const PAGE_SIZES: &[u32] = &[10, 20, 50, 100];

/// What a table offers besides listing
pub struct TableOptions<R> {
    pub title: &'static str,
    pub topics: TopicSet,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    /// Row title click (e.g. open the detail page)
    pub on_open: Option<Rc<dyn Fn(&R)>>,
}

impl<R> TableOptions<R> {
    pub fn crud(title: &'static str, topics: TopicSet) -> Self {
        Self {
            title,
            topics,
            can_create: true,
            can_edit: true,
            can_delete: true,
            on_open: None,
        }
    }
}

pub fn render_table<R: Resource>(
    list: &ListViewModel<R>,
    bus: &EventBus,
    options: TableOptions<R>,
) -> Result<Element, JsValue> {
    let options = Rc::new(options);
    let state = list.state();

    let search = ElementBuilder::new("input")?
        .class("search-input")
        .attr("type", "search")?
        .attr("placeholder", "Search…")?
        .build();
    if let Some(input) = search.dyn_ref::<HtmlInputElement>() {
        input.set_value(&state.search);
    }
    {
        let list = list.clone();
        on_input(&search, move |text| list.input_search(text))?;
    }

    let toolbar = ElementBuilder::new("div")?
        .class("panel-toolbar")
        .child(ElementBuilder::new("h2")?.text(options.title).build())?
        .child(search)?;
    let toolbar = if options.can_create {
        let add = ElementBuilder::new("button")?
            .class("btn btn-primary")
            .attr("type", "button")?
            .text("New")
            .build();
        let bus = bus.clone();
        let topic = options.topics.drawer;
        on_click(&add, move |_| bus.publish(topic, serde_json::Value::from(NEW_RECORD)))?;
        toolbar.child(add)?
    } else {
        toolbar
    };

    let body = ElementBuilder::new("div")?.class("panel-body").build();
    let footer = ElementBuilder::new("div")?.class("pagination").build();

    let panel = ElementBuilder::new("section")?
        .class("panel")
        .child(toolbar.build())?
        .child(body.clone())?
        .child(footer.clone())?
        .build();

    paint(list, bus, &options, &body, &footer)?;
    {
        let list_for_paint = list.clone();
        let bus = bus.clone();
        list.subscribe(move || {
            if let Err(e) = paint(&list_for_paint, &bus, &options, &body, &footer) {
                log::error!("❌ [TABLE] Render failed: {:?}", e);
            }
        });
    }

    Ok(panel)
}

fn paint<R: Resource>(
    list: &ListViewModel<R>,
    bus: &EventBus,
    options: &TableOptions<R>,
    body: &Element,
    footer: &Element,
) -> Result<(), JsValue> {
    let state = list.state();
    clear(body);
    clear(footer);

    if let Some(error) = &state.error {
        let banner = ElementBuilder::new("div")?.class("banner banner-error").text(error).build();
        append_child(body, &banner)?;
    }

    match state.status() {
        ListStatus::Loading => {
            append_child(body, &ElementBuilder::new("div")?.class("table-loading").text("Loading…").build())?;
        }
        ListStatus::Empty => {
            let message = if state.search.is_empty() {
                "Nothing here yet".to_string()
            } else {
                format!("No results for \"{}\"", state.search)
            };
            append_child(body, &ElementBuilder::new("div")?.class("table-empty").text(&message).build())?;
        }
        ListStatus::Error => {}
        ListStatus::Rows => {
            append_child(body, &render_rows(&state, bus, options)?)?;
        }
    }

    render_pagination(list, &state, footer)
}

fn render_rows<R: Resource>(state: &ListState<R>, bus: &EventBus, options: &TableOptions<R>) -> Result<Element, JsValue> {
    let mut head = ElementBuilder::new("tr")?;
    for column in R::COLUMNS {
        head = head.child(ElementBuilder::new("th")?.text(column.label).build())?;
    }
    if options.can_edit || options.can_delete {
        head = head.child(ElementBuilder::new("th")?.class("actions").build())?;
    }

    let tbody = ElementBuilder::new("tbody")?.build();
    for record in &state.rows {
        append_child(&tbody, &render_row(record, bus, options)?)?;
    }

    let table = ElementBuilder::new("table")?
        .class(if state.loading { "table is-refreshing" } else { "table" })
        .child(ElementBuilder::new("thead")?.child(head.build())?.build())?
        .child(tbody)?
        .build();
    Ok(table)
}

fn render_row<R: Resource>(record: &R, bus: &EventBus, options: &TableOptions<R>) -> Result<Element, JsValue> {
    let row = ElementBuilder::new("tr")?.build();

    for (index, column) in R::COLUMNS.iter().enumerate() {
        let cell = ElementBuilder::new("td")?.build();
        if index == 0 {
            if let Some(src) = record.image() {
                let img = ElementBuilder::new("img")?
                    .class("thumb")
                    .attr("src", src)?
                    .attr("alt", "")?
                    .build();
                fallback_image(&img)?;
                append_child(&cell, &img)?;
            }
        }

        let text = ElementBuilder::new("span")?.text(&record.cell(column.key)).build();
        if index == 0 {
            if let Some(on_open) = options.on_open.clone() {
                text.set_class_name("link");
                let record = record.clone();
                on_click(&text, move |_| on_open(&record))?;
            }
        }
        append_child(&cell, &text)?;
        append_child(&row, &cell)?;
    }

    if options.can_edit || options.can_delete {
        let actions = ElementBuilder::new("td")?.class("actions").build();
        if options.can_edit {
            let edit = ElementBuilder::new("button")?.class("btn btn-small").text("Edit").build();
            let bus = bus.clone();
            let record = record.clone();
            let topic = options.topics.drawer;
            on_click(&edit, move |_| bus.publish_record(topic, &record))?;
            append_child(&actions, &edit)?;
        }
        if options.can_delete {
            let delete = ElementBuilder::new("button")?.class("btn btn-small btn-danger").text("Delete").build();
            let bus = bus.clone();
            let record = record.clone();
            let topic = options.topics.confirmation;
            on_click(&delete, move |_| bus.publish_record(topic, &record))?;
            append_child(&actions, &delete)?;
        }
        append_child(&row, &actions)?;
    }

    Ok(row)
}

fn render_pagination<R: Resource>(list: &ListViewModel<R>, state: &ListState<R>, footer: &Element) -> Result<(), JsValue> {
    let pagination = state.pagination;

    let label = ElementBuilder::new("span")?.class("range").text(&pagination.range_label()).build();

    let prev = ElementBuilder::new("button")?
        .class("btn btn-small")
        .text("‹ Prev")
        .flag("disabled", !pagination.has_prev())?
        .build();
    {
        let list = list.clone();
        let page = pagination.page().saturating_sub(1);
        on_click(&prev, move |_| list.go_to_page(page))?;
    }

    let position = ElementBuilder::new("span")?
        .class("page")
        .text(&format!("Page {} of {}", pagination.page(), pagination.page_count()))
        .build();

    let next = ElementBuilder::new("button")?
        .class("btn btn-small")
        .text("Next ›")
        .flag("disabled", !pagination.has_next())?
        .build();
    {
        let list = list.clone();
        let page = pagination.page() + 1;
        on_click(&next, move |_| list.go_to_page(page))?;
    }

    let sizes = ElementBuilder::new("select")?.class("page-size").build();
    for size in PAGE_SIZES {
        let option = ElementBuilder::new("option")?
            .attr("value", &size.to_string())?
            .text(&format!("{} / page", size))
            .flag("selected", *size == pagination.limit())?
            .build();
        append_child(&sizes, &option)?;
    }
    {
        let list = list.clone();
        let select = sizes.clone();
        on_change(&sizes, move |_| {
            let limit = control_value(&select).and_then(|value| value.parse::<u32>().ok());
            if let Some(limit) = limit {
                list.on_paginate(1, limit);
            }
        })?;
    }

    for child in [label, prev, position, next, sizes] {
        append_child(footer, &child)?;
    }
    Ok(())
}
