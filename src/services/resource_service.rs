// Generic list / save / delete against an entity's Endpoints

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{ListPage, ListQuery};
use crate::services::api_client::{ApiClient, ApiError, ApiRequest};
use crate::services::endpoints::Endpoints;

pub async fn fetch_page<R: DeserializeOwned>(
    api: &ApiClient,
    endpoints: &Endpoints,
    query: &ListQuery,
) -> Result<ListPage<R>, ApiError> {
    let body = api.request(endpoints.list_request(query)).await?;
    ListPage::from_value(body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Send a prepared write (save or delete) and return the raw body
pub async fn send(api: &ApiClient, request: ApiRequest) -> Result<Value, ApiError> {
    api.request(request).await
}

/// Single record endpoints answer either with the record or `{ data: record }`
pub fn unwrap_record(body: Value) -> Value {
    match body {
        Value::Object(mut fields) if fields.get("data").is_some_and(Value::is_object) => {
            fields.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub async fn fetch_record<R: DeserializeOwned>(api: &ApiClient, endpoint: String) -> Result<R, ApiError> {
    let body = api.request(ApiRequest::get(endpoint)).await?;
    serde_json::from_value(unwrap_record(body)).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_are_unwrapped_from_data() {
        assert_eq!(unwrap_record(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_record(json!({"id": 1, "data": "raw"})), json!({"id": 1, "data": "raw"}));
        assert_eq!(unwrap_record(json!({"id": 2})), json!({"id": 2}));
    }
}
