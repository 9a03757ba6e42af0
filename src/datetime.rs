use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Parses the API's ISO-8601 timestamps. Timestamps without an offset are
/// treated as UTC.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|parsed| Utc.from_utc_datetime(&parsed))
}

/// Formats a start time in the configured display offset, `"n/a"` when the
/// source value never parsed.
pub fn to_display(start: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    match start {
        Some(start) => start
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "n/a".to_string(),
    }
}
