// ============================================================================
// CATALOG ADMIN - browser dashboard for the catalog marketplace
// ============================================================================
// Layers:
// - views: build DOM, forward input
// - viewmodels: UI state and coordination (lists, drawers, guard, session)
// - services: talk to the remote API
// - state: process-wide stores with change notification
// - events: in-process publish/subscribe bus
// - models: records exchanged with the backend
// ============================================================================

mod app;
mod config;
mod dom;
mod events;
mod models;
mod router;
mod services;
mod state;
mod utils;
mod viewmodels;
mod views;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::CONFIG;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("🚀 Catalog admin starting ({})", CONFIG.environment);

    let app = App::new()?;
    app.start()?;

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    Ok(())
}

/// Ask every mounted list to fetch again (callable from JavaScript)
#[wasm_bindgen]
pub fn refresh_data() {
    APP.with(|cell| {
        if let Some(app) = cell.borrow().as_ref() {
            app.state()
                .bus
                .publish(events::topics::REFRESH_DATA, serde_json::Value::Null);
        }
    });
}
