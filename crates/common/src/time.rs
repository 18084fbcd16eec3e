//! Relative timestamps for comment listings.

use chrono::{DateTime, Utc};

/// Describe how long ago `ts` was, relative to `now`.
///
/// Returns `"Unknown"` when no timestamp is available so a single bad row
/// never breaks a whole listing.
pub fn format_relative(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = ts else {
        return "Unknown".to_string();
    };
    let minutes = (now - ts).num_seconds().div_euclid(60);
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(hours / 24, "day")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
