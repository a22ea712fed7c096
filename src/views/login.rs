// ============================================================================
// LOGIN VIEW - full-screen sign-in form
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{on_input, on_submit, set_text_content, ElementBuilder};
use crate::state::AppState;
use crate::viewmodels::session_viewmodel::LoginForm;
use crate::viewmodels::SessionViewModel;
use crate::views::page::Page;

pub fn render_login(state: &AppState) -> Result<Page, JsValue> {
    let vm = SessionViewModel::new(state.session.clone(), state.router.clone(), state.api.clone());

    let email = ElementBuilder::new("input")?
        .id("login-email")?
        .attr("type", "email")?
        .attr("autocomplete", "username")?
        .attr("placeholder", "you@example.com")?
        .build();
    {
        let vm = vm.clone();
        on_input(&email, move |value| vm.set_email(value))?;
    }

    let password = ElementBuilder::new("input")?
        .id("login-password")?
        .attr("type", "password")?
        .attr("autocomplete", "current-password")?
        .build();
    {
        let vm = vm.clone();
        on_input(&password, move |value| vm.set_password(value))?;
    }

    let error = ElementBuilder::new("p")?.class("form-error").build();
    let submit = ElementBuilder::new("button")?
        .class("btn btn-primary btn-block")
        .attr("type", "submit")?
        .build();

    let form = ElementBuilder::new("form")?
        .class("login-form")
        .child(ElementBuilder::new("h1")?.text("Sign in").build())?
        .child(
            ElementBuilder::new("div")?
                .class("form-group")
                .child(ElementBuilder::new("label")?.attr("for", "login-email")?.text("Email").build())?
                .child(email)?
                .build(),
        )?
        .child(
            ElementBuilder::new("div")?
                .class("form-group")
                .child(ElementBuilder::new("label")?.attr("for", "login-password")?.text("Password").build())?
                .child(password)?
                .build(),
        )?
        .child(error.clone())?
        .child(submit.clone())?
        .build();
    {
        let vm = vm.clone();
        on_submit(&form, move || vm.login())?;
    }

    paint_status(&vm.form(), &error, &submit)?;
    {
        let for_paint = vm.clone();
        vm.subscribe(move || {
            if let Err(e) = paint_status(&for_paint.form(), &error, &submit) {
                log::error!("❌ [LOGIN] Render failed: {:?}", e);
            }
        });
    }

    let element = ElementBuilder::new("div")?.class("login-screen").child(form)?.build();
    Ok(Page::new(element))
}

/// Inputs keep focus; only the error line and button change
fn paint_status(form: &LoginForm, error: &Element, submit: &Element) -> Result<(), JsValue> {
    set_text_content(error, form.error.as_deref().unwrap_or(""));
    set_text_content(submit, if form.is_processing { "Signing in…" } else { "Sign in" });
    if form.is_processing {
        submit.set_attribute("disabled", "")
    } else {
        submit.remove_attribute("disabled")
    }
}
