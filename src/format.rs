// Number formatting for stat tiles.
// Large values are compacted ("12.3K"), smaller ones printed as plain digits.

/// Values at or above this are shown in compact notation.
pub const COMPACT_THRESHOLD: u64 = 10_000;

const UNITS: [(u64, &str); 4] = [
    (1_000, "K"),
    (1_000_000, "M"),
    (1_000_000_000, "B"),
    (1_000_000_000_000, "T"),
];

/// Format a count for display.
///
/// Compact output keeps at most one fraction digit, rounds half up, and moves to the
/// next unit when rounding reaches a thousand of the current one (999_960 is "1M").
pub fn format_number(value: u64) -> String {
    if value < COMPACT_THRESHOLD {
        return value.to_string();
    }

    let mut index = UNITS
        .iter()
        .rposition(|(scale, _)| value >= *scale)
        .unwrap_or(0);

    loop {
        let (scale, suffix) = UNITS[index];
        let tenths = round_tenths(value, scale);
        if tenths >= 10_000 && index + 1 < UNITS.len() {
            index += 1;
            continue;
        }
        return if tenths % 10 == 0 {
            format!("{}{}", tenths / 10, suffix)
        } else {
            format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
        };
    }
}

/// `value / scale` in tenths, rounded half up.
fn round_tenths(value: u64, scale: u64) -> u128 {
    let scale = scale as u128;
    (value as u128 * 10 + scale / 2) / scale
}
