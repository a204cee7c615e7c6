//! Time formatting helpers.

use mgrant_types::Timestamp;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Format a duration in seconds to a compact human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < MINUTE {
        format!("{}s", secs)
    } else if secs < HOUR {
        format!("{}m {}s", secs / MINUTE, secs % MINUTE)
    } else if secs < DAY {
        format!("{}h {}m", secs / HOUR, (secs % HOUR) / MINUTE)
    } else {
        format!("{}d {}h", secs / DAY, (secs % DAY) / HOUR)
    }
}

/// How long ago `then` was, as shown next to a comment.
///
/// Buckets truncate: 59 minutes is `59m ago`, 119 minutes is `1h ago`.
/// Timestamps in the future read as `just now`.
pub fn format_relative(then: Timestamp, now: Timestamp) -> String {
    let ago = then.elapsed_since(now);
    if ago < MINUTE {
        "just now".to_string()
    } else if ago < HOUR {
        format!("{}m ago", ago / MINUTE)
    } else if ago < DAY {
        format!("{}h ago", ago / HOUR)
    } else {
        format!("{}d ago", ago / DAY)
    }
}

/// Time left before a deadline as `{hours}h {minutes}m`, seconds dropped.
///
/// Hours are not rolled over into days.
pub fn format_countdown(secs_left: u64) -> String {
    format!("{}h {}m", secs_left / HOUR, (secs_left % HOUR) / MINUTE)
}
