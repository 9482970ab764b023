//! Unit conversion helpers shared by the readings.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with two decimals and a binary unit, e.g. `"1.50 KB"`.
///
/// The unit advances while the displayed value would reach 1024, so a count
/// just under a boundary reads `"1.00 MB"` rather than `"1024.00 KB"`.
/// Values past the largest unit stay in `TB`.
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while round_to_cents(size) >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, UNITS[unit])
}

/// `round(part / whole * 100)`, clamped to 100. A zero `whole` yields 0.
pub fn percent_of(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let percent = (part as f64 / whole as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
