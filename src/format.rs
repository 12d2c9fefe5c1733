use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Offset of Africa/Kampala (EAT, no daylight saving), in seconds.
const KAMPALA_OFFSET_SECS: i32 = 3 * 3600;

fn kampala() -> FixedOffset {
    FixedOffset::east_opt(KAMPALA_OFFSET_SECS).unwrap_or(Utc.fix())
}

/// Formats a timestamp in airport local time, e.g. `Mar 1, 2025, 11:05`.
pub fn format_date_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&kampala())
        .format("%b %-d, %Y, %H:%M")
        .to_string()
}

/// Formats how long ago `timestamp` was, relative to `now`.
///
/// Under a minute is `Just now`, then minutes, hours and days up to a week;
/// older timestamps fall back to [`format_date_time`].
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        format_date_time(timestamp)
    }
}
