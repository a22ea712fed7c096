pub mod controller;
pub mod debounce;
pub mod list_viewmodel;
pub mod look_products;
pub mod resource;
pub mod route_guard;
pub mod session_viewmodel;

pub use controller::{ConfirmationController, DrawerController};
pub use list_viewmodel::ListViewModel;
pub use session_viewmodel::SessionViewModel;
