use chrono::{DateTime, Utc};
use regex::Regex;

/// Parse an ISO8601 timestamp; anything unparseable falls back to the epoch.
pub fn parse_published_at(date_str: &str) -> DateTime<Utc> {
    date_str
        .parse::<DateTime<Utc>>()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Parse an ISO8601 duration of the restricted PT[nH][nM][nS] form to total
/// seconds. Strings outside that grammar count as zero seconds.
pub fn parse_iso8601_duration_to_seconds(duration: &str) -> u64 {
    fn components(duration: &str) -> Option<(u64, u64, u64)> {
        let re = Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").ok()?;
        let caps = re.captures(duration)?;
        let group = |i: usize| -> u64 {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        Some((group(1), group(2), group(3)))
    }

    match components(duration) {
        Some((hours, minutes, seconds)) => hours * 3600 + minutes * 60 + seconds,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn full_duration_is_summed() {
        assert_eq!(parse_iso8601_duration_to_seconds("PT1H2M3S"), 3723);
    }

    #[test]
    fn missing_components_count_as_zero() {
        assert_eq!(parse_iso8601_duration_to_seconds("PT90S"), 90);
        assert_eq!(parse_iso8601_duration_to_seconds("PT5M"), 300);
        assert_eq!(parse_iso8601_duration_to_seconds("PT2H"), 7200);
        assert_eq!(parse_iso8601_duration_to_seconds("PT"), 0);
    }

    #[test]
    fn malformed_durations_are_zero() {
        assert_eq!(parse_iso8601_duration_to_seconds(""), 0);
        assert_eq!(parse_iso8601_duration_to_seconds("P1D"), 0);
        assert_eq!(parse_iso8601_duration_to_seconds("PT5X"), 0);
        assert_eq!(parse_iso8601_duration_to_seconds("1h30m"), 0);
    }

    #[test]
    fn timestamps_parse_to_utc() {
        let parsed = parse_published_at("2024-03-05T14:30:00Z");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap());
    }

    #[test]
    fn bad_timestamps_fall_back_to_epoch() {
        assert_eq!(parse_published_at("not a date"), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(parse_published_at(""), DateTime::<Utc>::UNIX_EPOCH);
    }
}
