// Display helpers for API values

use chrono::{DateTime, NaiveDate, Utc};

/// `2024-03-05T10:00:00Z` -> `Mar 5, 2024`. Unparseable input is shown as-is.
pub fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc).format("%b %-d, %Y").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

pub fn format_optional_date(raw: Option<&str>) -> String {
    raw.map(format_date).unwrap_or_else(|| "—".to_string())
}

/// Amounts arrive in minor units (cents)
pub fn format_money(cents: Option<i64>) -> String {
    match cents {
        Some(cents) => {
            let sign = if cents < 0 { "-" } else { "" };
            let cents = cents.unsigned_abs();
            format!("{}${}.{:02}", sign, cents / 100, cents % 100)
        }
        None => "—".to_string(),
    }
}
