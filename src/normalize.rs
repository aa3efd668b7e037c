// 🧹 Data Normalizer - Canonical names, coerced numbers, one Total Allocation
//
// Pure transform over the loaded table: no I/O, no mutation of inputs.
//
// The Total Allocation derivation encodes the 2017 reporting change as a
// fallback, not as arithmetic: use "Total Plan & Non-Plan" when the row
// has it (post-change rows), else fall back to "Total (Plan)" (pre-change
// rows). The two schemes are never merged by addition - a row with
// neither figure stays missing.

use crate::config::ExplorerConfig;
use crate::record::{normalize_year, parse_amount, NormalizedRecord, RawBudgetRecord};
use std::collections::HashMap;

// ============================================================================
// NORMALIZER
// ============================================================================

pub struct Normalizer {
    /// variant -> canonical, built once from the config alias rules
    alias_map: HashMap<String, String>,
}

impl Normalizer {
    pub fn new(config: &ExplorerConfig) -> Self {
        let alias_map = config
            .ministry_aliases
            .iter()
            .map(|rule| (rule.variant.clone(), rule.canonical.clone()))
            .collect();

        Normalizer { alias_map }
    }

    /// Resolve a ministry name to its canonical spelling.
    ///
    /// Unmapped names pass through unchanged (not an error - downstream
    /// watchlist filtering simply ignores them). Idempotent: canonical
    /// spellings are not themselves variants, so a second application is
    /// a no-op.
    pub fn canonical_name(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self.alias_map.get(trimmed) {
            Some(canonical) => canonical.clone(),
            None => trimmed.to_string(),
        }
    }

    /// Normalize a single raw row.
    pub fn normalize_record(&self, raw: &RawBudgetRecord) -> NormalizedRecord {
        let total_plan = parse_amount(&raw.total_plan);
        let total_plan_and_non_plan = parse_amount(&raw.total_plan_and_non_plan);

        // Schema bridge: combined figure wins, plan-only total is the
        // pre-2017 fallback. Both missing -> missing.
        let total_allocation = total_plan_and_non_plan.or(total_plan);

        NormalizedRecord {
            ministry_name: self.canonical_name(&raw.ministry_name),
            year: normalize_year(&raw.year),
            revenue_plan: parse_amount(&raw.revenue_plan),
            capital_plan: parse_amount(&raw.capital_plan),
            total_plan,
            revenue_non_plan: parse_amount(&raw.revenue_non_plan),
            capital_non_plan: parse_amount(&raw.capital_non_plan),
            total_non_plan: parse_amount(&raw.total_non_plan),
            total_plan_and_non_plan,
            total_allocation,
        }
    }

    /// Normalize the whole table. Order of rows is preserved.
    pub fn normalize(&self, raw: &[RawBudgetRecord]) -> Vec<NormalizedRecord> {
        raw.iter().map(|r| self.normalize_record(r)).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
