use chrono::{DateTime, Utc};

/// Seconds left before `last + cooldown_secs` elapses, or `None` if ready.
///
/// A `now` earlier than `last` (clock skew) counts as the full cooldown.
pub fn cooldown_remaining(
    last: Option<DateTime<Utc>>,
    cooldown_secs: u64,
    now: DateTime<Utc>,
) -> Option<u64> {
    let last = last?;
    let elapsed = (now - last).num_seconds().max(0) as u64;
    if elapsed >= cooldown_secs {
        None
    } else {
        Some(cooldown_secs - elapsed)
    }
}

/// Formats a remaining duration like "1h 05m" or "4m 10s".
pub fn format_remaining(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m {:02}s", minutes, seconds)
    }
}
