//! Human-readable rendering of second counts for reports.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// Render a run duration as minutes and seconds: `330.0` becomes `"5m 30s"`.
///
/// Fractional seconds are truncated. Absent or non-finite input renders as `"N/A"`.
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(total) = whole_seconds(seconds) else {
        return "N/A".to_string();
    };

    let minutes = total / MINUTE;
    let secs = total % MINUTE;
    if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Render an MTTR as hours and minutes: `7200.0` becomes `"2h 0m"`.
///
/// Anything under a minute renders in seconds so short recoveries stay visible.
pub fn format_mttr(seconds: Option<f64>) -> String {
    let Some(total) = whole_seconds(seconds) else {
        return "N/A".to_string();
    };

    let hours = total / HOUR;
    let minutes = (total % HOUR) / MINUTE;
    match (hours, minutes) {
        (0, 0) => format!("{total}s"),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

fn whole_seconds(seconds: Option<f64>) -> Option<u64> {
    let value = seconds.filter(|v| v.is_finite())?;
    // negatives clamp to zero
    Some(value.max(0.0).trunc() as u64)
}
