/// Shown in place of a name the server could not resolve.
pub const PLACEHOLDER: &str = "—";

/// `2024-03-05T14:22:07.123Z` -> `2024-03-05 14:22:07`.
/// Plain text truncation: no timezone conversion.
pub fn timestamp(raw: Option<&str>) -> String {
    match raw {
        Some(s) => s.chars().take(19).collect::<String>().replacen('T', " ", 1),
        None => String::new(),
    }
}

/// First 10 characters of an ISO date or date-time.
pub fn date(raw: Option<&str>) -> String {
    raw.map(|s| s.chars().take(10).collect()).unwrap_or_default()
}

pub fn amount(val: Option<f64>) -> String {
    val.map(|v| format!("{v:.2}")).unwrap_or_default()
}

pub fn or_placeholder(val: Option<&str>) -> String {
    val.unwrap_or(PLACEHOLDER).to_string()
}
