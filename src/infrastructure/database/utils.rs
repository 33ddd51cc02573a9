use chrono::{DateTime, Utc};

/// Parse an RFC 3339 timestamp column into UTC.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Render a UTC timestamp for storage. All timestamp columns are RFC 3339
/// text so downstream readers can sort and filter lexicographically.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(now)).expect("parse");
        assert_eq!(parsed, now);
    }

    #[test]
    fn formatted_timestamps_sort_lexicographically() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::minutes(5);
        assert!(format_datetime(earlier) < format_datetime(later));
    }
}
