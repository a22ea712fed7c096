// Record ids arrive as strings or numbers depending on the endpoint; the
// client normalises them to strings on ingress.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Int(value) => value.to_string(),
            RawId::Float(value) => value.to_string(),
        }
    }
}

pub fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(String::from).filter(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "optional")]
        id: Option<String>,
    }

    fn id_of(value: serde_json::Value) -> Option<String> {
        serde_json::from_value::<Holder>(value).unwrap().id
    }

    #[test]
    fn numbers_and_strings_normalise_to_strings() {
        assert_eq!(id_of(json!({"id": 42})), Some("42".to_string()));
        assert_eq!(id_of(json!({"id": "b-7"})), Some("b-7".to_string()));
        assert_eq!(id_of(json!({"id": null})), None);
        assert_eq!(id_of(json!({"id": ""})), None);
        assert_eq!(id_of(json!({})), None);
    }
}
