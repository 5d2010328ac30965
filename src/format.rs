//! Formatting helpers for human-readable durations.

/// Formats a length in seconds (e.g. "45s", "3m 32s", "1h 01m 05s").
#[must_use]
pub fn format_duration(secs: u64) -> String {
    if secs >= 3600 {
        format!(
            "{}h {:02}m {:02}s",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        )
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
