// Query-string helpers. The URL is the source of truth for list state, so
// list views read and write their own keys and leave the rest untouched.

use url::form_urlencoded;

/// Decode `?a=1&b=2` (leading `?` optional) into ordered pairs
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

pub fn get_param(query: &str, key: &str) -> Option<String> {
    parse_query(query)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value)
}

/// Apply `updates` to `query`: `Some` sets (in place, or appended), `None` removes.
/// Returns the encoded query without a leading `?`.
pub fn merge_params(query: &str, updates: &[(&str, Option<String>)]) -> String {
    let mut pairs = parse_query(query);

    for (key, value) in updates {
        match value {
            Some(value) => {
                if let Some(existing) = pairs.iter_mut().find(|(k, _)| k.as_str() == *key) {
                    existing.1 = value.clone();
                } else {
                    pairs.push((key.to_string(), value.clone()));
                }
            }
            None => pairs.retain(|(k, _)| k.as_str() != *key),
        }
    }

    encode_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

pub fn encode_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
