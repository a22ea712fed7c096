// ============================================================================
// STATE MODULE - Rc<RefCell> stores with change notification
// ============================================================================

pub mod app_state;
pub mod reactivity;
pub mod session_state;
pub mod ui_state;

pub use app_state::AppState;
pub use reactivity::Subscribers;
pub use session_state::SessionState;
pub use ui_state::UiState;
