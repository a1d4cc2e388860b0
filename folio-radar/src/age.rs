use chrono::{DateTime, Utc};

/// Compact age: `42s`, `5m`, `3h`, `2d`.
pub fn format_age(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}

/// Age of an RFC 3339 timestamp relative to `now`. `None` if unparseable.
pub fn age_since(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    let then = DateTime::parse_from_rfc3339(timestamp).ok()?;
    let delta = now.signed_duration_since(then.with_timezone(&Utc));
    Some(format_age(delta.num_seconds()))
}
