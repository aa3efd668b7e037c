// ✅ Load Quality Report - What the cleaning pass had to do
//
// The normalizer recovers locally from bad cells (missing, not fatal),
// which means the load can silently degrade. This report makes the
// degradation visible: which rows could not produce a Total Allocation,
// which ministry spellings went through unmapped, and how many rows came
// from each reporting schema. Issues never abort the load.

use crate::config::ExplorerConfig;
use crate::record::{parse_amount, NormalizedRecord, RawBudgetRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// ISSUE + SEVERITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Warning, // Row cannot contribute to any aggregate
    Info,    // Recovered or merely notable
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub row: usize,
    pub ministry: String,
    pub year: String,
    pub issue: String,
}

// ============================================================================
// LOAD REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_total: usize,

    /// Rows that produced a Total Allocation
    pub rows_usable: usize,

    /// Rows where neither the combined nor the plan total was present
    pub rows_unusable: usize,

    /// Rows that used the combined "Total Plan & Non-Plan" figure
    pub rows_combined_schema: usize,

    /// Rows that fell back to the pre-2017 "Total (Plan)" figure
    pub rows_plan_fallback: usize,

    /// Distinct ministry spellings the alias table did not map
    pub unmapped_ministries: Vec<String>,

    pub issues: Vec<QualityIssue>,
}

impl LoadReport {
    /// Build the report by walking raw and normalized rows side by side.
    pub fn build(
        raw: &[RawBudgetRecord],
        normalized: &[NormalizedRecord],
        config: &ExplorerConfig,
    ) -> Self {
        let known_variants: HashSet<&str> = config
            .ministry_aliases
            .iter()
            .map(|r| r.variant.as_str())
            .collect();
        // Canonical targets and watchlist names are expected spellings,
        // not candidates for the alias table
        let known_canonicals: HashSet<&str> = config
            .ministry_aliases
            .iter()
            .map(|r| r.canonical.as_str())
            .chain(config.watchlist.iter().map(|w| w.as_str()))
            .collect();

        let mut report = LoadReport {
            rows_total: normalized.len(),
            rows_usable: 0,
            rows_unusable: 0,
            rows_combined_schema: 0,
            rows_plan_fallback: 0,
            unmapped_ministries: Vec::new(),
            issues: Vec::new(),
        };

        let mut unmapped: HashSet<String> = HashSet::new();

        for (index, (raw_row, row)) in raw.iter().zip(normalized.iter()).enumerate() {
            match (row.total_plan_and_non_plan, row.total_plan) {
                (Some(_), _) => report.rows_combined_schema += 1,
                (None, Some(_)) => report.rows_plan_fallback += 1,
                (None, None) => {}
            }

            if row.is_usable() {
                report.rows_usable += 1;
            } else {
                report.rows_unusable += 1;
                report.issues.push(QualityIssue {
                    severity: Severity::Warning,
                    row: index,
                    ministry: row.ministry_name.clone(),
                    year: row.year.clone(),
                    issue: "no usable total: both 'Total Plan & Non-Plan' and 'Total (Plan)' \
                            are missing"
                        .to_string(),
                });
            }

            // Cells that held something other than a number or the
            // placeholder were coerced to missing - worth a note
            for (field, cell) in [
                ("Revenue (Plan)", raw_row.revenue_plan.as_str()),
                ("Capital (Plan)", raw_row.capital_plan.as_str()),
                ("Total (Plan)", raw_row.total_plan.as_str()),
                ("Revenue (Non-Plan)", raw_row.revenue_non_plan.as_str()),
                ("Capital (Non-Plan)", raw_row.capital_non_plan.as_str()),
                ("Total (Non-Plan)", raw_row.total_non_plan.as_str()),
                (
                    "Total Plan & Non-Plan",
                    raw_row.total_plan_and_non_plan.as_str(),
                ),
            ] {
                if is_malformed_cell(cell) {
                    report.issues.push(QualityIssue {
                        severity: Severity::Info,
                        row: index,
                        ministry: row.ministry_name.clone(),
                        year: row.year.clone(),
                        issue: format!("malformed numeric cell in '{}': {:?}", field, cell),
                    });
                }
            }

            let spelling = raw_row.ministry_name.trim();
            if !known_variants.contains(spelling) && !known_canonicals.contains(spelling) {
                unmapped.insert(spelling.to_string());
            }
        }

        report.unmapped_ministries = unmapped.into_iter().collect();
        report.unmapped_ministries.sort();
        report
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// One-line digest for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "{} rows ({} usable, {} unusable), {} combined-schema, {} plan-fallback, \
             {} unmapped spellings, {} warnings",
            self.rows_total,
            self.rows_usable,
            self.rows_unusable,
            self.rows_combined_schema,
            self.rows_plan_fallback,
            self.unmapped_ministries.len(),
            self.warning_count(),
        )
    }
}

/// A cell is malformed when it is neither empty, nor the placeholder,
/// nor parseable as an amount.
fn is_malformed_cell(cell: &str) -> bool {
    let trimmed = cell.trim();
    !trimmed.is_empty() && trimmed != crate::record::MISSING_PLACEHOLDER && parse_amount(cell).is_none()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;

    fn raw_row(ministry: &str, year: &str, total_plan: &str, combined: &str) -> RawBudgetRecord {
        RawBudgetRecord {
            ministry_name: ministry.to_string(),
            year: year.to_string(),
            revenue_plan: "-".to_string(),
            capital_plan: "-".to_string(),
            total_plan: total_plan.to_string(),
            revenue_non_plan: "-".to_string(),
            capital_non_plan: "-".to_string(),
            total_non_plan: "-".to_string(),
            total_plan_and_non_plan: combined.to_string(),
        }
    }

    fn build_report(raw: Vec<RawBudgetRecord>) -> LoadReport {
        let config = ExplorerConfig::default();
        let normalized = Normalizer::new(&config).normalize(&raw);
        LoadReport::build(&raw, &normalized, &config)
    }

    #[test]
    fn test_report_counts_schemas() {
        let report = build_report(vec![
            raw_row("MINISTRY OF DEFENCE", "2014-2015", "100", "-"),
            raw_row("MINISTRY OF DEFENCE", "2020-2021", "-", "500"),
        ]);

        assert_eq!(report.rows_total, 2);
        assert_eq!(report.rows_usable, 2);
        assert_eq!(report.rows_plan_fallback, 1);
        assert_eq!(report.rows_combined_schema, 1);
    }

    #[test]
    fn test_unusable_row_is_a_warning() {
        let report = build_report(vec![raw_row("MINISTRY OF DEFENCE", "2015-2016", "-", "-")]);

        assert_eq!(report.rows_unusable, 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.issues[0].issue.contains("no usable total"));
    }

    #[test]
    fn test_malformed_cell_is_an_info_issue() {
        let report = build_report(vec![raw_row(
            "MINISTRY OF DEFENCE",
            "2014-2015",
            "12a4",
            "500",
        )]);

        // Row is still usable via the combined figure
        assert_eq!(report.rows_usable, 1);
        assert_eq!(report.warning_count(), 0);
        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Info && i.issue.contains("Total (Plan)")));
    }

    #[test]
    fn test_unmapped_spelling_is_recorded_not_failed() {
        let report = build_report(vec![raw_row(
            "MINISTRY OF CIVIL AVIATION",
            "2014-2015",
            "100",
            "-",
        )]);

        assert_eq!(
            report.unmapped_ministries,
            vec!["MINISTRY OF CIVIL AVIATION"]
        );
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_known_variant_not_reported_unmapped() {
        let report = build_report(vec![raw_row(
            "MINISTRY OF AGRICULTURE",
            "2014-2015",
            "100",
            "-",
        )]);

        assert!(report.unmapped_ministries.is_empty());
    }

    #[test]
    fn test_summary_mentions_counts() {
        let report = build_report(vec![raw_row("MINISTRY OF DEFENCE", "2014-2015", "100", "-")]);
        let summary = report.summary();
        assert!(summary.contains("1 rows"));
        assert!(summary.contains("1 usable"));
    }
}
