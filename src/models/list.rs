use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::utils::query::encode_pairs;

/// What a list view asks the API for
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub offset: u32,
    pub limit: u32,
}

impl ListQuery {
    /// `search=..&offset=..&limit=..`; an empty search is left out
    pub fn to_query_string(&self) -> String {
        let offset = self.offset.to_string();
        let limit = self.limit.to_string();
        let mut pairs = Vec::with_capacity(3);
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("search", search.trim()));
        }
        pairs.push(("offset", offset.as_str()));
        pairs.push(("limit", limit.as_str()));
        encode_pairs(pairs)
    }
}

/// One page of records as returned by a list endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub total: u64,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
        }
    }
}

// Endpoints disagree on the envelope: `{data, total}`, `{rows, count}`,
// `{items, total}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Paged {
        #[serde(alias = "rows", alias = "items", alias = "results")]
        data: Vec<T>,
        #[serde(default, alias = "count", alias = "totalCount")]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T: DeserializeOwned> ListPage<T> {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let envelope: ListEnvelope<T> = serde_json::from_value(value)?;
        Ok(match envelope {
            ListEnvelope::Paged { data, total } => {
                let total = total.unwrap_or(data.len() as u64);
                Self { rows: data, total }
            }
            ListEnvelope::Bare(rows) => {
                let total = rows.len() as u64;
                Self { rows, total }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Brand;
    use serde_json::json;

    #[test]
    fn accepts_the_known_envelopes() {
        let page = ListPage::<Brand>::from_value(json!({"data": [{"id": 1, "name": "Acme"}], "total": 31})).unwrap();
        assert_eq!(page.total, 31);
        assert_eq!(page.rows[0].name.as_deref(), Some("Acme"));

        let page = ListPage::<Brand>::from_value(json!({"rows": [{"id": 1}, {"id": 2}], "count": 2})).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.total, 2);

        let page = ListPage::<Brand>::from_value(json!([{"id": "x"}])).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn missing_total_falls_back_to_row_count() {
        let page = ListPage::<Brand>::from_value(json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}]})).unwrap();
        assert_eq!(page.total, 3);
    }

    #[test]
    fn query_string_skips_blank_search() {
        let query = ListQuery { search: Some("  ".to_string()), offset: 40, limit: 20 };
        assert_eq!(query.to_query_string(), "offset=40&limit=20");

        let query = ListQuery { search: Some(" red dress ".to_string()), offset: 0, limit: 10 };
        assert_eq!(query.to_query_string(), "search=red+dress&offset=0&limit=10");
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(ListPage::<Brand>::from_value(json!({"message": "nope"})).is_err());
    }
}
