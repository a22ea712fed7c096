pub mod api_client;
pub mod auth_service;
pub mod endpoints;
pub mod resource_service;

pub use api_client::{ApiClient, ApiError, ApiRequest, HttpMethod};
pub use endpoints::Endpoints;
