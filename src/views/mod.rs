// Views only build DOM and forward user input to viewmodels

pub mod brand_detail;
pub mod brand_portal;
pub mod confirmation;
pub mod drawer;
pub mod entity;
pub mod layout;
pub mod login;
pub mod looks;
pub mod page;
pub mod pages;
pub mod table;

pub use layout::Shell;
pub use page::Page;

use wasm_bindgen::JsValue;

use crate::router::Route;
use crate::state::AppState;

/// Build the page for `route`
pub fn render_page(state: &AppState, route: &Route) -> Result<Page, JsValue> {
    match route {
        Route::Login => login::render_login(state),
        Route::Home => pages::render_home(state),
        Route::Users => pages::render_users(state),
        Route::Brands => pages::render_brands(state),
        Route::BrandDetail(id) => brand_detail::render_brand_detail(state, id),
        Route::Locations => pages::render_locations(state),
        Route::Looks => looks::render_looks(state),
        Route::BrandPortal => brand_portal::render_brand_portal(state),
        Route::NotFound(path) => pages::render_not_found(path),
    }
}
