// ============================================================================
// API CLIENT - authenticated HTTP only (no retries, no cache)
// ============================================================================

use std::fmt;

use gloo_net::http::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::config::CONFIG;
use crate::state::session_state::SessionState;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http { status: u16, message: Option<String> },
    #[error("Unexpected response: {0}")]
    Parse(String),
    #[error("Could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Text for a toast: the server's message when it sent one
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message: Some(message), .. } => message.clone(),
            ApiError::Http { status: 401, .. } => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Http { status: 403, .. } => "You are not allowed to do that.".to_string(),
            ApiError::Network(_) => "Could not reach the server. Check your connection.".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    fn as_method(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One call to the remote API
#[derive(Clone, Debug, Default)]
pub struct ApiRequest {
    /// Path relative to the backend URL, query string included
    pub endpoint: String,
    pub method: HttpMethod,
    pub data: Option<Value>,
    /// Send `data` as multipart/form-data instead of JSON
    pub has_files: bool,
    pub files: Vec<(String, web_sys::File)>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            ..Self::default()
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn post<T: Serialize>(endpoint: impl Into<String>, data: &T) -> Result<Self, ApiError> {
        Self::new(HttpMethod::Post, endpoint).with_data(data)
    }

    pub fn with_data<T: Serialize>(mut self, data: &T) -> Result<Self, ApiError> {
        self.data = Some(serde_json::to_value(data).map_err(|e| ApiError::Encode(e.to_string()))?);
        Ok(self)
    }

    /// Switch to multipart and attach files
    pub fn with_files(mut self, files: Vec<(String, web_sys::File)>) -> Self {
        self.has_files = true;
        self.files = files;
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionState,
}

impl ApiClient {
    pub fn new(session: SessionState) -> Self {
        Self {
            base_url: CONFIG.backend_url().to_string(),
            session,
        }
    }

    /// Perform `request` and return the parsed body (`Null` for empty bodies)
    pub async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = join_url(&self.base_url, &request.endpoint);
        log::debug!("🌐 [API] {} {}", request.method, request.endpoint);
        let started = js_sys::Date::now();

        let mut builder = RequestBuilder::new(&url)
            .method(request.method.as_method())
            .header("Accept", "application/json");
        if let Some(token) = self.session.token() {
            builder = builder.header("Authorization", &bearer(&token));
        }

        let prepared = if request.has_files {
            let form = build_form_data(request.data.as_ref(), &request.files)
                .map_err(|e| ApiError::Encode(format!("{:?}", e)))?;
            builder.body(form)
        } else if let Some(data) = &request.data {
            builder.json(data)
        } else {
            builder.build()
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            let error = ApiError::Http {
                status,
                message: server_message(&text),
            };
            log::warn!("⚠️ [API] {} {} -> {}", request.method, request.endpoint, error);
            if status == 401 && self.session.token().is_some() {
                // Token rejected: drop it so the route guard sends the user to login
                self.session.clear_token();
            }
            return Err(error);
        }

        log::debug!(
            "✅ [API] {} {} -> {} ({:.0} ms)",
            request.method,
            request.endpoint,
            status,
            js_sys::Date::now() - started
        );
        parse_body(&text)
    }

    /// `request` + decode into `T`
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let body = self.request(request).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

pub fn join_url(base: &str, endpoint: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), endpoint.trim_start_matches('/'))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Parse a successful body; empty bodies (204) become `Null`
pub fn parse_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Server-provided error text: `message`, `error`, or the first of `errors`
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let pick = |value: &Value| -> Option<String> {
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Object(fields) => fields
                .get("message")
                .or_else(|| fields.get("msg"))
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string),
            _ => None,
        }
    };

    let fields = value.as_object()?;
    fields
        .get("message")
        .and_then(pick)
        .or_else(|| fields.get("error").and_then(pick))
        .or_else(|| {
            fields
                .get("errors")
                .and_then(Value::as_array)
                .and_then(|errors| errors.first())
                .and_then(pick)
        })
}

/// Flatten a JSON object into multipart text fields. Nulls are skipped,
/// nested values are sent as JSON text.
pub fn multipart_fields(data: &Value) -> Vec<(String, String)> {
    let Some(fields) = data.as_object() else {
        return Vec::new();
    };
    fields
        .iter()
        .filter_map(|(name, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(text) => text.clone(),
                Value::Bool(flag) => flag.to_string(),
                Value::Number(number) => number.to_string(),
                other => other.to_string(),
            };
            Some((name.clone(), text))
        })
        .collect()
}

fn build_form_data(data: Option<&Value>, files: &[(String, web_sys::File)]) -> Result<web_sys::FormData, JsValue> {
    let form = web_sys::FormData::new()?;
    if let Some(data) = data {
        for (name, text) in multipart_fields(data) {
            form.append_with_str(&name, &text)?;
        }
    }
    for (name, file) in files {
        form.append_with_blob_and_filename(name, file, &file.name())?;
    }
    Ok(form)
}
