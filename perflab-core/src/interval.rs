//! Bar interval parsing and annualization factors.

/// Annualization factor used when the interval label cannot be parsed.
pub const DEFAULT_ANNUALIZATION: f64 = 252.0;

/// Parse an interval label ("1m", "15m", "4h", "1d", "1w", "1M") into minutes.
///
/// Lowercase `m` is minutes, uppercase `M` is months. Returns `None` for
/// anything that does not match `<number><unit>`.
pub fn interval_minutes(label: &str) -> Option<u64> {
    let label = label.trim();
    if label.len() < 2 {
        return None;
    }
    let (num, unit) = label.split_at(label.len() - 1);
    let n: u64 = num.parse().ok()?;
    if n == 0 {
        return None;
    }
    let per_unit = match unit {
        "m" => 1,
        "h" => 60,
        "d" => 1_440,
        "w" => 10_080,
        "M" => 43_200,
        _ => return None,
    };
    Some(n * per_unit)
}

/// Number of bars per year for a given interval label.
///
/// Deterministic lookup by interval length; unknown labels fall back to
/// `DEFAULT_ANNUALIZATION` (daily trading convention).
pub fn annualization_factor(label: &str) -> f64 {
    let Some(minutes) = interval_minutes(label) else {
        return DEFAULT_ANNUALIZATION;
    };
    match minutes {
        0..=1 => 525_600.0,
        2..=5 => 105_120.0,
        6..=15 => 35_040.0,
        16..=30 => 17_520.0,
        31..=60 => 8_760.0,
        61..=240 => 2_190.0,
        241..=360 => 1_460.0,
        361..=720 => 730.0,
        721..=1_440 => 365.0,
        1_441..=10_080 => 52.0,
        _ => 12.0,
    }
}
