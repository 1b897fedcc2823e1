const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;

/// Short age of the last commit relative to `now` (both Unix seconds).
///
/// `"never"` without a commit, `"{d}d {h}h"` (or `"{d}d"`) from one day on,
/// `"HH:MM"` below that. Always floors.
pub fn format_last_commit(ts: Option<i64>, now: i64) -> String {
    let Some(ts) = ts else {
        return "never".to_string();
    };
    // Commit times in the future (clock skew) read as "just now".
    let delta = (now - ts).max(0);

    if delta >= SECS_PER_DAY {
        let days = delta / SECS_PER_DAY;
        let hours = (delta % SECS_PER_DAY) / SECS_PER_HOUR;
        if hours > 0 {
            format!("{days}d {hours}h")
        } else {
            format!("{days}d")
        }
    } else {
        let hours = delta / SECS_PER_HOUR;
        let minutes = (delta / 60) % 60;
        format!("{hours:02}:{minutes:02}")
    }
}
