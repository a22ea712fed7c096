use crate::models::{LoginRequest, LoginResponse};
use crate::services::api_client::{ApiClient, ApiError, ApiRequest};

pub const LOGIN_ENDPOINT: &str = "/users/login";

/// Exchange credentials for a token, profile and permission set
pub async fn perform_login(api: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let request = ApiRequest::post(
        LOGIN_ENDPOINT,
        &LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        },
    )?;

    log::info!("🔐 [AUTH] Signing in {}", email.trim());
    api.fetch::<LoginResponse>(request).await
}
