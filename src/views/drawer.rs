// ============================================================================
// DRAWER VIEW - side panel form for a DrawerController
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

use crate::dom::{
    append_child, clear, control_value, on_change, on_click, on_input, on_submit, selected_file, ElementBuilder,
};
use crate::services::ApiClient;
use crate::viewmodels::controller::{DrawerController, DrawerState};
use crate::viewmodels::resource::{Field, FieldKind, Resource};

pub fn render_drawer<R: Resource>(drawer: &DrawerController<R>, api: &ApiClient) -> Result<Element, JsValue> {
    let host = ElementBuilder::new("div")?.class("drawer-host").build();
    paint(drawer, api, &host)?;

    let for_paint = drawer.clone();
    let api = api.clone();
    let target = host.clone();
    drawer.subscribe(move || {
        if let Err(e) = paint(&for_paint, &api, &target) {
            log::error!("❌ [DRAWER] Render failed: {:?}", e);
        }
    });
    Ok(host)
}

fn paint<R: Resource>(drawer: &DrawerController<R>, api: &ApiClient, host: &Element) -> Result<(), JsValue> {
    clear(host);
    let state = drawer.state();
    if !state.open {
        return Ok(());
    }

    let title = if state.record.is_some() {
        format!("Edit {}", R::LABEL)
    } else {
        format!("New {}", R::LABEL)
    };

    let close = ElementBuilder::new("button")?
        .class("btn-icon")
        .attr("type", "button")?
        .attr("aria-label", "Close")?
        .text("×")
        .build();
    {
        let drawer = drawer.clone();
        on_click(&close, move |_| drawer.close())?;
    }

    let form = ElementBuilder::new("form")?.class("drawer-form").build();
    for field in R::FIELDS {
        append_child(&form, &render_field(drawer, &state, field)?)?;
    }

    if let Some(error) = &state.error {
        append_child(&form, &ElementBuilder::new("p")?.class("form-error").text(error).build())?;
    }

    let cancel = ElementBuilder::new("button")?
        .class("btn")
        .attr("type", "button")?
        .text("Cancel")
        .build();
    {
        let drawer = drawer.clone();
        on_click(&cancel, move |_| drawer.close())?;
    }
    let save = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .attr("type", "submit")?
        .text(if state.is_processing { "Saving…" } else { "Save" })
        .flag("disabled", state.is_processing)?
        .build();
    let footer = ElementBuilder::new("div")?
        .class("drawer-footer")
        .child(cancel)?
        .child(save)?
        .build();
    append_child(&form, &footer)?;

    {
        let drawer = drawer.clone();
        let api = api.clone();
        on_submit(&form, move || drawer.save(&api))?;
    }

    let panel = ElementBuilder::new("aside")?
        .class("drawer")
        .child(
            ElementBuilder::new("header")?
                .class("drawer-header")
                .child(ElementBuilder::new("h3")?.text(&title).build())?
                .child(close)?
                .build(),
        )?
        .child(form)?
        .build();

    let backdrop = ElementBuilder::new("div")?.class("backdrop").build();
    {
        let drawer = drawer.clone();
        on_click(&backdrop, move |_| {
            if !drawer.is_processing() {
                drawer.close();
            }
        })?;
    }

    append_child(host, &backdrop)?;
    append_child(host, &panel)
}

fn render_field<R: Resource>(drawer: &DrawerController<R>, state: &DrawerState<R>, field: &Field) -> Result<Element, JsValue> {
    let id = format!("field-{}", field.name);
    let label_text = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };
    let label = ElementBuilder::new("label")?.attr("for", &id)?.text(&label_text).build();
    let value = state.form.text(field.name);

    let control = match field.kind {
        FieldKind::TextArea => {
            let area = ElementBuilder::new("textarea")?.id(&id)?.attr("rows", "4")?.build();
            if let Some(area) = area.dyn_ref::<HtmlTextAreaElement>() {
                area.set_value(&value);
            }
            area
        }
        FieldKind::Select(options) => {
            let select = ElementBuilder::new("select")?.id(&id)?.build();
            append_child(&select, &ElementBuilder::new("option")?.attr("value", "")?.text("Select…").build())?;
            for (option_value, option_label) in options {
                let option = ElementBuilder::new("option")?
                    .attr("value", option_value)?
                    .text(option_label)
                    .flag("selected", *option_value == value)?
                    .build();
                append_child(&select, &option)?;
            }
            select
        }
        FieldKind::File => ElementBuilder::new("input")?
            .id(&id)?
            .attr("type", "file")?
            .attr("accept", "image/*")?
            .build(),
        kind => {
            let input_type = match kind {
                FieldKind::Email => "email",
                FieldKind::Password => "password",
                FieldKind::Number => "number",
                FieldKind::Date => "date",
                _ => "text",
            };
            let input = ElementBuilder::new("input")?.id(&id)?.attr("type", input_type)?.build();
            if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
                // Date inputs only accept YYYY-MM-DD
                let shown: String = if kind == FieldKind::Date { value.chars().take(10).collect() } else { value.clone() };
                input.set_value(&shown);
            }
            input
        }
    };

    let name = field.name;
    match field.kind {
        FieldKind::File => {
            let drawer = drawer.clone();
            let input = control.clone();
            on_change(&control, move |_| {
                if let Some(file) = selected_file(&input) {
                    drawer.set_file(name, file);
                }
            })?;
        }
        FieldKind::Select(_) => {
            let drawer = drawer.clone();
            let select = control.clone();
            on_change(&control, move |_| {
                let value = control_value(&select).unwrap_or_default();
                drawer.set_field(name, &value);
            })?;
        }
        _ => {
            let drawer = drawer.clone();
            on_input(&control, move |value| drawer.set_field(name, &value))?;
        }
    }

    let group = ElementBuilder::new("div")?
        .class("form-group")
        .child(label)?
        .child(control)?
        .build();
    Ok(group)
}
