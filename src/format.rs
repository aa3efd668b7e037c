// 💰 Rupee Formatting - Crore-scale amounts for display
//
// Allocations in the source file are in ₹ Crore. The presentation layer
// renders them in the unit that reads naturally at their magnitude.

/// Format a ₹ Crore amount for display.
///
/// Thresholds: ≥ 100000 Cr renders as Lakh Crore with one decimal,
/// ≥ 1000 Cr as Thousand Crore with no decimals, anything smaller as
/// plain Crore with no decimals.
pub fn format_inr(amount: f64) -> String {
    if amount >= 100_000.0 {
        format!("₹{:.1} Lakh Cr", amount / 100_000.0)
    } else if amount >= 1_000.0 {
        format!("₹{:.0} Thousand Cr", amount / 1_000.0)
    } else {
        format!("₹{:.0} Cr", amount)
    }
}

/// Format an optional amount; missing values render as "n/a".
pub fn format_inr_opt(amount: Option<f64>) -> String {
    match amount {
        Some(value) => format_inr(value),
        None => "n/a".to_string(),
    }
}

/// Format an optional percentage share; missing shares render as "n/a".
pub fn format_percent_opt(percent: Option<f64>) -> String {
    match percent {
        Some(value) => format!("{:.1}%", value),
        None => "n/a".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
