//! Pivot distance and display formatting helpers.

/// Placeholder shown where a reference level was not reported.
pub const MISSING_LEVEL: &str = "--";

/// Signed percentage offset of `last_price` from `pivot`: `(last_price - pivot) / pivot * 100`.
///
/// Returns `0.0` when the pivot is absent, zero or non-finite, so this never divides by zero.
pub fn pivot_distance_pct(last_price: f64, pivot: Option<f64>) -> f64 {
    match pivot {
        Some(pivot) if pivot != 0.0 && pivot.is_finite() => {
            let distance = (last_price - pivot) / pivot * 100.0;
            if distance.is_finite() { distance } else { 0.0 }
        }
        _ => 0.0,
    }
}

/// Format a percentage to two decimals with an explicit sign, eg/ "+5.26%", "-2.10%".
///
/// Values that round to zero are shown unsigned as "0.00%".
pub fn format_signed_pct(value: f64) -> String {
    let magnitude = format!("{:.2}", value.abs());
    if magnitude == "0.00" {
        return "0.00%".to_string();
    }

    if value > 0.0 {
        format!("+{magnitude}%")
    } else {
        format!("-{magnitude}%")
    }
}

/// Format a price or level to two decimals.
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Format an optional reference level, falling back to [`MISSING_LEVEL`].
pub fn format_level(level: Option<f64>) -> String {
    level
        .map(format_price)
        .unwrap_or_else(|| MISSING_LEVEL.to_string())
}
