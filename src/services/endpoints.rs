// REST paths per entity. Requests are built here and sent by ApiClient.

use serde_json::Value;

use crate::models::ListQuery;
use crate::services::api_client::{ApiRequest, HttpMethod};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// GET target of the list view (may already carry a query string)
    pub list: String,
    /// POST target; items live at `{collection}/{id}`
    pub collection: String,
    /// Appended to the item path on update, e.g. `/change-creator`
    pub update_suffix: Option<&'static str>,
    /// Writes are sent as multipart/form-data
    pub multipart: bool,
}

impl Endpoints {
    /// Plain REST resource: list and create on the collection
    pub fn rest(collection: &str) -> Self {
        Self {
            list: collection.to_string(),
            collection: collection.to_string(),
            update_suffix: None,
            multipart: false,
        }
    }

    pub fn item(&self, id: &str) -> String {
        format!("{}/{}", self.collection, id)
    }

    pub fn list_request(&self, query: &ListQuery) -> ApiRequest {
        let separator = if self.list.contains('?') { '&' } else { '?' };
        ApiRequest::get(format!("{}{}{}", self.list, separator, query.to_query_string()))
    }

    /// POST for a new record, PUT when `id` is known
    pub fn save_request(&self, id: Option<&str>, data: Value, files: Vec<(String, web_sys::File)>) -> ApiRequest {
        let (method, endpoint) = match id {
            Some(id) => (
                HttpMethod::Put,
                format!("{}{}", self.item(id), self.update_suffix.unwrap_or("")),
            ),
            None => (HttpMethod::Post, self.collection.clone()),
        };
        let request = ApiRequest {
            endpoint,
            method,
            data: Some(data),
            ..ApiRequest::default()
        };
        if self.multipart {
            request.with_files(files)
        } else {
            request
        }
    }

    pub fn delete_request(&self, id: &str) -> ApiRequest {
        ApiRequest::delete(self.item(id))
    }
}

pub fn users() -> Endpoints {
    Endpoints::rest("/users")
}

pub fn brands() -> Endpoints {
    Endpoints::rest("/brands")
}

pub fn locations() -> Endpoints {
    Endpoints::rest("/locations")
}

/// Looks are curated by creators; the dashboard only reassigns them
pub fn looks() -> Endpoints {
    Endpoints {
        update_suffix: Some("/change-creator"),
        ..Endpoints::rest("/looks")
    }
}

pub fn brand_members(brand_id: &str) -> Endpoints {
    Endpoints {
        list: format!("/campaigns/users/list/{}", brand_id),
        ..Endpoints::rest(&format!("/brands/{}/members", brand_id))
    }
}

pub fn brand_campaigns(brand_id: &str) -> Endpoints {
    Endpoints {
        list: format!("/campaigns/ad-campaigns?brandId={}", brand_id),
        ..Endpoints::rest("/campaigns/ad-campaigns")
    }
}

pub fn brand_ads(brand_id: &str) -> Endpoints {
    Endpoints {
        list: format!("/campaigns/advertisements?brandId={}", brand_id),
        multipart: true,
        ..Endpoints::rest("/campaigns/advertisements")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> ListQuery {
        ListQuery { search: None, offset: 20, limit: 10 }
    }

    #[test]
    fn list_requests_append_the_page_window() {
        assert_eq!(users().list_request(&query()).endpoint, "/users?offset=20&limit=10");
        assert_eq!(
            brand_campaigns("b9").list_request(&query()).endpoint,
            "/campaigns/ad-campaigns?brandId=b9&offset=20&limit=10"
        );
        assert_eq!(
            brand_members("b9").list_request(&query()).endpoint,
            "/campaigns/users/list/b9?offset=20&limit=10"
        );
    }

    #[test]
    fn save_posts_new_records_and_puts_existing_ones() {
        let create = brands().save_request(None, json!({"name": "Acme"}), Vec::new());
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.endpoint, "/brands");

        let update = brands().save_request(Some("4"), json!({"name": "Acme"}), Vec::new());
        assert_eq!(update.method, HttpMethod::Put);
        assert_eq!(update.endpoint, "/brands/4");
    }

    #[test]
    fn look_updates_go_through_change_creator() {
        let update = looks().save_request(Some("l1"), json!({"creatorId": "c2"}), Vec::new());
        assert_eq!(update.endpoint, "/looks/l1/change-creator");
        assert_eq!(looks().delete_request("l1").endpoint, "/looks/l1");
    }

    #[test]
    fn ad_writes_are_multipart() {
        let update = brand_ads("b1").save_request(Some("3"), json!({"title": "x"}), Vec::new());
        assert_eq!(update.endpoint, "/campaigns/advertisements/3");
        assert!(update.has_files);

        let delete = brand_campaigns("b1").delete_request("7");
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.endpoint, "/campaigns/ad-campaigns/7");
    }
}
