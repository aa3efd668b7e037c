// 📋 Budget Records - Raw rows, normalized rows, share rows
//
// The union budget CSV mixes two reporting schemas: up to 2016-2017 each
// ministry reports Revenue/Capital/Total under Plan and Non-Plan buckets;
// from 2017-2018 onward only a single "Total Plan & Non-Plan" figure is
// published. Numeric cells carry thousands separators and use "-" as a
// not-applicable placeholder, so every numeric field is read as text and
// coerced explicitly.

use serde::{Deserialize, Serialize};

// ============================================================================
// RAW RECORD (one CSV row, as published)
// ============================================================================

/// One row of the raw budget CSV. All numeric fields stay as strings here;
/// coercion happens in the normalizer so a malformed cell degrades to a
/// missing value instead of failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBudgetRecord {
    #[serde(rename = "Ministry Name")]
    pub ministry_name: String,

    /// Fiscal year label, nominally "YYYY-YYYY" but sometimes with
    /// trailing annotations in the source file.
    #[serde(rename = "Year")]
    pub year: String,

    #[serde(rename = "Revenue (Plan)", default)]
    pub revenue_plan: String,

    #[serde(rename = "Capital (Plan)", default)]
    pub capital_plan: String,

    #[serde(rename = "Total (Plan)", default)]
    pub total_plan: String,

    #[serde(rename = "Revenue (Non-Plan)", default)]
    pub revenue_non_plan: String,

    #[serde(rename = "Capital (Non-Plan)", default)]
    pub capital_non_plan: String,

    #[serde(rename = "Total (Non-Plan)", default)]
    pub total_non_plan: String,

    /// Combined figure, only populated after the 2017 reporting change.
    #[serde(rename = "Total Plan & Non-Plan", default)]
    pub total_plan_and_non_plan: String,
}

// ============================================================================
// NORMALIZED RECORD
// ============================================================================

/// A cleaned row: canonical ministry spelling, canonical year label,
/// numeric fields coerced, and the single derived Total Allocation.
///
/// `total_allocation` is the combined figure when present, else the
/// Plan-only total. A row with neither stays `None` and is excluded from
/// every downstream sum - it must never silently count as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub ministry_name: String,
    pub year: String,

    pub revenue_plan: Option<f64>,
    pub capital_plan: Option<f64>,
    pub total_plan: Option<f64>,
    pub revenue_non_plan: Option<f64>,
    pub capital_non_plan: Option<f64>,
    pub total_non_plan: Option<f64>,
    pub total_plan_and_non_plan: Option<f64>,

    /// Derived: combined total if present, else plan total, else missing.
    pub total_allocation: Option<f64>,
}

impl NormalizedRecord {
    /// A row is usable when it produced a Total Allocation.
    pub fn is_usable(&self) -> bool {
        self.total_allocation.is_some()
    }
}

// ============================================================================
// SHARE RECORD (watchlist rows annotated with yearly share)
// ============================================================================

/// A watchlist row annotated with its year's aggregate and the row's
/// percentage share of it. `percent_of_total` is `None` whenever the row's
/// allocation or the year total is missing, or the year total is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRecord {
    pub ministry_name: String,
    pub year: String,
    pub total_allocation: Option<f64>,
    pub year_total: Option<f64>,
    pub percent_of_total: Option<f64>,
}

// ============================================================================
// FIELD COERCION HELPERS
// ============================================================================

/// Placeholder the source uses for "not applicable / not reported".
pub const MISSING_PLACEHOLDER: &str = "-";

/// Parse a budget amount cell.
///
/// Strips the thousands separator, treats the "-" placeholder and empty
/// cells as missing, and degrades any other parse failure to missing.
/// Never panics and never returns an error - a bad cell costs one value,
/// not the load.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING_PLACEHOLDER {
        return None;
    }
    trimmed.replace(',', "").parse::<f64>().ok()
}

/// Normalize a fiscal year label to the canonical 9-character
/// "YYYY-YYYY" token so year strings join exactly across rows.
///
/// Trailing annotations and whitespace are cut; labels too short to carry
/// a full token are returned trimmed as-is (they will simply never match
/// a canonical selection).
pub fn normalize_year(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.get(..9) {
        Some(token) => token.to_string(),
        None => trimmed.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_plain() {
        assert_eq!(parse_amount("150000"), Some(150000.0));
        assert_eq!(parse_amount("45.99"), Some(45.99));
    }

    #[test]
    fn test_parse_amount_thousands_separator() {
        // A value with separators parses to the same number as without
        assert_eq!(parse_amount("1,50,000"), parse_amount("150000"));
        assert_eq!(parse_amount("2,345.67"), Some(2345.67));
    }

    #[test]
    fn test_parse_amount_placeholder_is_missing() {
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount(" - "), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
    }

    #[test]
    fn test_parse_amount_garbage_is_missing() {
        assert_eq!(parse_amount("N/A"), None);
        assert_eq!(parse_amount("12a4"), None);
    }

    #[test]
    fn test_normalize_year_trims_to_token() {
        assert_eq!(normalize_year("2014-2015"), "2014-2015");
        assert_eq!(normalize_year("2014-2015 (revised)"), "2014-2015");
        assert_eq!(normalize_year("  2020-2021  "), "2020-2021");
    }

    #[test]
    fn test_normalize_year_short_label_passes_through() {
        assert_eq!(normalize_year("2014"), "2014");
        assert_eq!(normalize_year(""), "");
    }
}
