//! Percent-nonzero statistic formatting.

/// Sentinel shown when both counts are zero (nothing was merged).
pub const EMPTY_SENTINEL: &str = "MT";

/// Formats the share of non-zero bytes as a percentage string.
///
/// The value is computed on an integer basis of hundredths of a percent
/// and rendered with at most two decimal digits; trailing zeros and a
/// trailing decimal point are trimmed, so half-and-half formats as `"50"`
/// rather than `"50.00"`. When both counts are zero there is no ratio to
/// report and [`EMPTY_SENTINEL`] is returned.
#[must_use]
pub fn percent_nonzero(common_count: u64, zero_count: u64) -> String {
    let total = common_count + zero_count;
    if total == 0 {
        return EMPTY_SENTINEL.to_owned();
    }

    // Hundredths of a percent, computed wide enough that huge files
    // cannot overflow the multiplication.
    let basis = (u128::from(common_count) * 10_000 / u128::from(total)) as u64;
    let mut text = format!("{:.2}", basis as f64 / 100.0);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}
