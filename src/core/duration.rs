//! Duration parsing and formatting.

use chrono::Duration;

/// Format a duration as `Xh Ym Zs`, dropping leading zero units.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_seconds = d.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Parse a poll interval like "5", "5s", "1m30s" or "500ms".
///
/// A bare number is taken as seconds.
#[must_use]
pub fn parse_interval(s: &str) -> Option<std::time::Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(seconds) = s.parse::<u64>() {
        return (seconds > 0).then(|| std::time::Duration::from_secs(seconds));
    }

    if let Some(ms) = s.strip_suffix("ms") {
        let ms: u64 = ms.trim().parse().ok()?;
        return (ms > 0).then(|| std::time::Duration::from_millis(ms));
    }

    let mut total_seconds: u64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if !current_num.is_empty() {
            let num: u64 = current_num.parse().ok()?;
            current_num.clear();

            let unit: u64 = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        } else {
            return None;
        }
    }

    if !current_num.is_empty() {
        total_seconds = total_seconds.checked_add(current_num.parse::<u64>().ok()?)?;
    }

    (total_seconds > 0).then(|| std::time::Duration::from_secs(total_seconds))
}

/// Serialize a `chrono::Duration` as whole seconds.
pub mod as_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        i64::deserialize(deserializer).map(Duration::seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::seconds(125)), "2m 5s");
        assert_eq!(format_duration(Duration::seconds(3 * 3600 + 61)), "3h 1m 1s");
        assert_eq!(format_duration(Duration::zero()), "0s");
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("5"), Some(std::time::Duration::from_secs(5)));
        assert_eq!(parse_interval("10s"), Some(std::time::Duration::from_secs(10)));
        assert_eq!(parse_interval("1m30s"), Some(std::time::Duration::from_secs(90)));
        assert_eq!(parse_interval("250ms"), Some(std::time::Duration::from_millis(250)));
        assert_eq!(parse_interval("0"), None);
        assert_eq!(parse_interval("soon"), None);
    }

    #[test]
    fn test_parse_interval_rejects_overflow() {
        assert_eq!(parse_interval("99999999999999999h"), None);
        assert_eq!(parse_interval("5124095576030431h1m"), None);
        assert_eq!(parse_interval("18446744073709551615s1s"), None);
        assert_eq!(parse_interval("99999999999999999999999"), None);
    }
}
