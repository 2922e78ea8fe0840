//! Formatting helpers shared by the CLI renderers.

use chrono::{DateTime, FixedOffset};

/// Format a timestamp relative to `now` (e.g., "3 hours ago").
///
/// Uses whole days, then whole hours, then whole minutes. Timestamps after
/// `now` render as "just now".
pub fn format_time_ago(ts: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        return "just now".to_string();
    }

    let days = duration.num_days();
    let hours = duration.num_hours();
    let minutes = duration.num_minutes();

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else {
        plural(minutes, "minute")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Format an hour of day on a 12-hour clock (e.g., "2pm").
pub fn format_hour(hour: u8) -> String {
    match hour % 24 {
        0 => "12am".to_string(),
        h @ 1..=11 => format!("{}am", h),
        12 => "12pm".to_string(),
        h => format!("{}pm", h - 12),
    }
}

/// Format an hour slot for display (e.g., "9am-10am").
pub fn hour_display(hour: u8) -> String {
    format!("{}-{}", format_hour(hour), format_hour((hour % 24 + 1) % 24))
}
