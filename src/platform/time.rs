//! Clocks and timestamp formatting
//!
//! `now_ms` is the monotonic frame clock the simulation runs on. `unix_ms` is
//! wall-clock time for the leaderboard, which speaks ISO-8601 UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
#[cfg(not(target_arch = "wasm32"))]
use chrono::Datelike;

/// Monotonic milliseconds (`performance.now()` in the browser)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Monotonic milliseconds since first use
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn unix_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn unix_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`, the same shape as JavaScript's `toISOString`
pub fn iso8601(unix_ms: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(unix_ms.floor() as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp as the leaderboard returns it: RFC 3339 with any offset
/// (`2024-05-01T12:34:56.789012+02:00`, `...Z`), or a zone-less UTC value
/// (`2024-05-01 12:34:56`). Dates that do not exist are rejected.
pub fn parse_iso8601(s: &str) -> Option<f64> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.timestamp_millis() as f64);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|at| at.and_utc().timestamp_millis() as f64)
}

/// `M/D/YY` in the player's local time zone
#[cfg(target_arch = "wasm32")]
fn short_date(unix_ms: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(unix_ms));
    format!(
        "{}/{}/{:02}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year() % 100
    )
}

/// `M/D/YY` in UTC
#[cfg(not(target_arch = "wasm32"))]
fn short_date(unix_ms: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(unix_ms.floor() as i64)
        .map(|date| format!("{}/{}/{:02}", date.month(), date.day(), date.year().rem_euclid(100)))
        .unwrap_or_default()
}

/// Human-friendly age of a timestamp ("Just now", "3 hours ago", "5/1/24")
pub fn relative_age(then_ms: f64, now_ms: f64) -> String {
    let diff_mins = (now_ms - then_ms) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            short_date(then_ms)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso8601_known_instants() {
        assert_eq!(iso8601(0.0), "1970-01-01T00:00:00.000Z");
        assert_eq!(iso8601(951_782_400_000.0), "2000-02-29T00:00:00.000Z");
        assert_eq!(iso8601(1_700_000_000_000.0), "2023-11-14T22:13:20.000Z");
        assert_eq!(iso8601(1_700_000_000_123.9), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_parse_iso8601() {
        assert_eq!(parse_iso8601("1970-01-01T00:00:00Z"), Some(0.0));
        assert_eq!(
            parse_iso8601("2023-11-14T22:13:20.000Z"),
            Some(1_700_000_000_000.0)
        );
        assert_eq!(
            parse_iso8601("2023-11-14T22:13:20.5+00:00"),
            Some(1_700_000_000_500.0)
        );
        assert_eq!(parse_iso8601("2023-11-14 22:13:20"), Some(1_700_000_000_000.0));
        assert_eq!(parse_iso8601("yesterday"), None);
        assert_eq!(parse_iso8601("2023-13-14T22:13:20Z"), None);
    }

    #[test]
    fn test_parse_honors_offsets() {
        let utc = parse_iso8601("2024-05-01T12:00:00Z");
        assert_eq!(utc, Some(1_714_564_800_000.0));
        assert_eq!(
            parse_iso8601("2024-05-01T12:00:00+02:00"),
            utc.map(|ms| ms - 2.0 * 3_600_000.0)
        );
        assert_eq!(
            parse_iso8601("2024-05-01T12:00:00.250-05:00"),
            utc.map(|ms| ms + 5.0 * 3_600_000.0 + 250.0)
        );
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert_eq!(parse_iso8601("2024-02-31T00:00:00Z"), None);
        assert_eq!(parse_iso8601("2023-02-29 00:00:00"), None);
        assert_eq!(parse_iso8601("2024-02-29T00:00:00Z"), Some(1_709_164_800_000.0));
    }

    #[test]
    fn test_round_trip_through_strings() {
        for ms in [0.0, 86_399_999.0, 951_868_799_999.0, 4_102_444_800_000.0] {
            assert_eq!(parse_iso8601(&iso8601(ms)), Some(ms));
        }
    }

    #[test]
    fn test_relative_age() {
        let now = 1_700_000_000_000.0;
        assert_eq!(relative_age(now - 10_000.0, now), "Just now");
        assert_eq!(relative_age(now - 60_000.0, now), "1 min ago");
        assert_eq!(relative_age(now - 5.0 * 3_600_000.0, now), "5 hours ago");
        assert_eq!(relative_age(now - 86_400_000.0, now), "Yesterday");
        assert_eq!(relative_age(now - 3.0 * 86_400_000.0, now), "3 days ago");
        assert_eq!(relative_age(951_782_400_000.0, now), "2/29/00");
    }
}
