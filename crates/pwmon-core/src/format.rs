//! Human-readable byte and age formatting helpers.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with binary (1024) steps, capped at TB.
///
/// Bytes are shown as a whole number, every larger unit with two decimals:
/// `0 B`, `1.50 KB`, `1.00 TB`. Values beyond the last unit keep growing
/// in TB (`1024.00 TB`).
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn human_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut val = bytes as f64;
    let mut unit = 0;
    while val >= 1024.0 && unit < UNITS.len() - 1 {
        val /= 1024.0;
        unit += 1;
    }
    format!("{val:.2} {}", UNITS[unit])
}

/// Seconds elapsed since `then`, clamped at zero for clock skew.
pub fn age_secs(then: i64, now: i64) -> i64 {
    now.saturating_sub(then).max(0)
}

/// "last 42s ago" style age label.
pub fn fmt_last_seen(then: i64, now: i64) -> String {
    format!("last {}s ago", age_secs(then, now))
}
