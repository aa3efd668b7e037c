// 📊 Share Calculator - Watchlist filter, yearly totals, percent shares
//
// Works on the normalized table only. Grouping and joins key on the
// canonical ministry name and the canonical year label, so the normalizer
// must run first.
//
// Missing values propagate: a row without a Total Allocation contributes
// nothing to its year total, and a year whose every watchlist row is
// missing gets no total at all. Shares guard the division - a zero or
// missing year total means the share is undefined (None), never NaN.

use crate::record::{NormalizedRecord, ShareRecord};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

// ============================================================================
// SELECTION ERROR
// ============================================================================

/// A (ministry, year) selection with no underlying row. Surfaced to the
/// user as "no data available for this selection", never as an
/// out-of-bounds access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    NoData { ministry: String, year: String },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoData { ministry, year } => write!(
                f,
                "no data available for this selection: {} / {}",
                ministry, year
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

// ============================================================================
// SHARE CALCULATOR
// ============================================================================

pub struct ShareCalculator {
    watchlist: HashSet<String>,
}

impl ShareCalculator {
    pub fn new(watchlist: &[String]) -> Self {
        ShareCalculator {
            watchlist: watchlist.iter().cloned().collect(),
        }
    }

    /// Filter to watchlist rows, compute each year's aggregate, and
    /// annotate every row with its percentage share of that aggregate.
    pub fn compute(&self, normalized: &[NormalizedRecord]) -> Vec<ShareRecord> {
        let filtered: Vec<&NormalizedRecord> = normalized
            .iter()
            .filter(|r| self.watchlist.contains(&r.ministry_name))
            .collect();

        // Year aggregates over rows that actually have a figure
        let mut year_totals: BTreeMap<String, Option<f64>> = BTreeMap::new();
        for record in &filtered {
            let entry = year_totals.entry(record.year.clone()).or_insert(None);
            if let Some(allocation) = record.total_allocation {
                *entry = Some(entry.unwrap_or(0.0) + allocation);
            }
        }

        filtered
            .iter()
            .map(|record| {
                let year_total = year_totals.get(&record.year).copied().flatten();
                let percent_of_total = match (record.total_allocation, year_total) {
                    (Some(allocation), Some(total)) if total != 0.0 => {
                        Some(100.0 * allocation / total)
                    }
                    _ => None,
                };

                ShareRecord {
                    ministry_name: record.ministry_name.clone(),
                    year: record.year.clone(),
                    total_allocation: record.total_allocation,
                    year_total,
                    percent_of_total,
                }
            })
            .collect()
    }
}

// ============================================================================
// SHARE TABLE QUERIES
// ============================================================================

/// Read-only query surface over the computed share table. This is what
/// the presentation layer (CLI, API server) selects years and ministries
/// against; it performs no further numeric derivation itself.
pub struct ShareTable {
    records: Vec<ShareRecord>,
}

impl ShareTable {
    pub fn new(records: Vec<ShareRecord>) -> Self {
        ShareTable { records }
    }

    pub fn records(&self) -> &[ShareRecord] {
        &self.records
    }

    /// Distinct year labels present, sorted ascending.
    pub fn years(&self) -> Vec<String> {
        let mut years: Vec<String> = self
            .records
            .iter()
            .map(|r| r.year.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        years.sort();
        years
    }

    /// Distinct ministry names present, sorted ascending.
    pub fn ministries(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .iter()
            .map(|r| r.ministry_name.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    /// The single row for a (ministry, year) pair, or a no-data error.
    pub fn select(&self, ministry: &str, year: &str) -> Result<&ShareRecord, SelectionError> {
        self.records
            .iter()
            .find(|r| r.ministry_name == ministry && r.year == year)
            .ok_or_else(|| SelectionError::NoData {
                ministry: ministry.to_string(),
                year: year.to_string(),
            })
    }

    /// All rows for one ministry across years, year-sorted. Empty result
    /// is a no-data error (the ministry is not in the table at all).
    pub fn ministry_trend(&self, ministry: &str) -> Result<Vec<&ShareRecord>, SelectionError> {
        let mut rows: Vec<&ShareRecord> = self
            .records
            .iter()
            .filter(|r| r.ministry_name == ministry)
            .collect();

        if rows.is_empty() {
            return Err(SelectionError::NoData {
                ministry: ministry.to_string(),
                year: "all years".to_string(),
            });
        }

        rows.sort_by(|a, b| a.year.cmp(&b.year));
        Ok(rows)
    }

    /// All watchlist rows for one year. Empty result is a no-data error.
    pub fn year_breakdown(&self, year: &str) -> Result<Vec<&ShareRecord>, SelectionError> {
        let mut rows: Vec<&ShareRecord> =
            self.records.iter().filter(|r| r.year == year).collect();

        if rows.is_empty() {
            return Err(SelectionError::NoData {
                ministry: "any watchlist ministry".to_string(),
                year: year.to_string(),
            });
        }

        rows.sort_by(|a, b| a.ministry_name.cmp(&b.ministry_name));
        Ok(rows)
    }

    /// How many times larger a ministry's allocation is in `to_year`
    /// than in `from_year` (the "Defence grew 3.1x" headline figure).
    ///
    /// Either endpoint missing its allocation - or a zero baseline, which
    /// would make the ratio meaningless - reports as no-data.
    pub fn growth_multiple(
        &self,
        ministry: &str,
        from_year: &str,
        to_year: &str,
    ) -> Result<f64, SelectionError> {
        let from = self.usable_allocation(ministry, from_year)?;
        let to = self.usable_allocation(ministry, to_year)?;

        if from == 0.0 {
            return Err(SelectionError::NoData {
                ministry: ministry.to_string(),
                year: from_year.to_string(),
            });
        }

        Ok(to / from)
    }

    /// Percentage-point change in a ministry's share between two years
    /// (the "Agriculture's share shrank N pp" headline figure).
    pub fn share_shift(
        &self,
        ministry: &str,
        from_year: &str,
        to_year: &str,
    ) -> Result<f64, SelectionError> {
        let from = self.usable_share(ministry, from_year)?;
        let to = self.usable_share(ministry, to_year)?;
        Ok(to - from)
    }

    fn usable_allocation(&self, ministry: &str, year: &str) -> Result<f64, SelectionError> {
        self.select(ministry, year)?
            .total_allocation
            .ok_or_else(|| SelectionError::NoData {
                ministry: ministry.to_string(),
                year: year.to_string(),
            })
    }

    fn usable_share(&self, ministry: &str, year: &str) -> Result<f64, SelectionError> {
        self.select(ministry, year)?
            .percent_of_total
            .ok_or_else(|| SelectionError::NoData {
                ministry: ministry.to_string(),
                year: year.to_string(),
            })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NormalizedRecord;

    fn normalized_row(ministry: &str, year: &str, total: Option<f64>) -> NormalizedRecord {
        NormalizedRecord {
            ministry_name: ministry.to_string(),
            year: year.to_string(),
            revenue_plan: None,
            capital_plan: None,
            total_plan: total,
            revenue_non_plan: None,
            capital_non_plan: None,
            total_non_plan: None,
            total_plan_and_non_plan: None,
            total_allocation: total,
        }
    }

    fn watchlist() -> Vec<String> {
        vec![
            "MINISTRY OF DEFENCE".to_string(),
            "MINISTRY OF FINANCE".to_string(),
        ]
    }

    #[test]
    fn test_compute_year_total_and_shares() {
        let calc = ShareCalculator::new(&watchlist());
        let shares = calc.compute(&[
            normalized_row("MINISTRY OF DEFENCE", "2020-2021", Some(100.0)),
            normalized_row("MINISTRY OF FINANCE", "2020-2021", Some(300.0)),
        ]);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].year_total, Some(400.0));
        assert_eq!(shares[0].percent_of_total, Some(25.0));
        assert_eq!(shares[1].percent_of_total, Some(75.0));
    }

    #[test]
    fn test_compute_filters_non_watchlist_rows() {
        let calc = ShareCalculator::new(&watchlist());
        let shares = calc.compute(&[
            normalized_row("MINISTRY OF DEFENCE", "2020-2021", Some(100.0)),
            normalized_row("MINISTRY OF TEXTILES", "2020-2021", Some(900.0)),
        ]);

        // Textiles is excluded both from the rows and from the year total
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].year_total, Some(100.0));
        assert_eq!(shares[0].percent_of_total, Some(100.0));
    }

    #[test]
    fn test_shares_sum_to_100_per_year() {
        let calc = ShareCalculator::new(&watchlist());
        let shares = calc.compute(&[
            normalized_row("MINISTRY OF DEFENCE", "2019-2020", Some(123.45)),
            normalized_row("MINISTRY OF FINANCE", "2019-2020", Some(678.9)),
            normalized_row("MINISTRY OF DEFENCE", "2020-2021", Some(50.0)),
            normalized_row("MINISTRY OF FINANCE", "2020-2021", Some(150.0)),
        ]);

        for year in ["2019-2020", "2020-2021"] {
            let sum: f64 = shares
                .iter()
                .filter(|r| r.year == year)
                .filter_map(|r| r.percent_of_total)
                .sum();
            assert!((sum - 100.0).abs() < 1e-9, "year {} sums to {}", year, sum);
        }
    }

    #[test]
    fn test_missing_allocation_excluded_from_year_total() {
        let calc = ShareCalculator::new(&watchlist());
        let shares = calc.compute(&[
            normalized_row("MINISTRY OF DEFENCE", "2015-2016", Some(100.0)),
            normalized_row("MINISTRY OF FINANCE", "2015-2016", None),
        ]);

        // The missing row does not count as zero in the aggregate
        assert_eq!(shares[0].year_total, Some(100.0));
        assert_eq!(shares[0].percent_of_total, Some(100.0));
        // ...and its own share is undefined, not 0%
        assert_eq!(shares[1].percent_of_total, None);
    }

    #[test]
    fn test_all_missing_year_has_no_total() {
        let calc = ShareCalculator::new(&watchlist());
        let shares = calc.compute(&[
            normalized_row("MINISTRY OF DEFENCE", "2015-2016", None),
            normalized_row("MINISTRY OF FINANCE", "2015-2016", None),
        ]);

        for record in &shares {
            assert_eq!(record.year_total, None);
            assert_eq!(record.percent_of_total, None);
        }
    }

    #[test]
    fn test_zero_year_total_yields_undefined_share() {
        let calc = ShareCalculator::new(&watchlist());
        let shares = calc.compute(&[
            normalized_row("MINISTRY OF DEFENCE", "2015-2016", Some(0.0)),
            normalized_row("MINISTRY OF FINANCE", "2015-2016", Some(0.0)),
        ]);

        // No division by zero, no NaN - shares are simply undefined
        for record in &shares {
            assert_eq!(record.year_total, Some(0.0));
            assert_eq!(record.percent_of_total, None);
        }
    }

    fn sample_table() -> ShareTable {
        let calc = ShareCalculator::new(&watchlist());
        ShareTable::new(calc.compute(&[
            normalized_row("MINISTRY OF DEFENCE", "2014-2015", Some(100.0)),
            normalized_row("MINISTRY OF FINANCE", "2014-2015", Some(400.0)),
            normalized_row("MINISTRY OF DEFENCE", "2024-2025", Some(310.0)),
            normalized_row("MINISTRY OF FINANCE", "2024-2025", Some(690.0)),
        ]))
    }

    #[test]
    fn test_select_existing_pair() {
        let table = sample_table();
        let record = table.select("MINISTRY OF DEFENCE", "2014-2015").unwrap();
        assert_eq!(record.total_allocation, Some(100.0));
        assert_eq!(record.percent_of_total, Some(20.0));
    }

    #[test]
    fn test_select_absent_pair_is_no_data() {
        let table = sample_table();
        let err = table
            .select("MINISTRY OF DEFENCE", "1999-2000")
            .unwrap_err();

        assert_eq!(
            err,
            SelectionError::NoData {
                ministry: "MINISTRY OF DEFENCE".to_string(),
                year: "1999-2000".to_string(),
            }
        );
        assert!(err.to_string().contains("no data available"));
    }

    #[test]
    fn test_years_and_ministries_sorted_distinct() {
        let table = sample_table();
        assert_eq!(table.years(), vec!["2014-2015", "2024-2025"]);
        assert_eq!(
            table.ministries(),
            vec!["MINISTRY OF DEFENCE", "MINISTRY OF FINANCE"]
        );
    }

    #[test]
    fn test_ministry_trend_sorted_by_year() {
        let table = sample_table();
        let trend = table.ministry_trend("MINISTRY OF DEFENCE").unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].year, "2014-2015");
        assert_eq!(trend[1].year, "2024-2025");
    }

    #[test]
    fn test_year_breakdown_absent_year_is_no_data() {
        let table = sample_table();
        assert!(table.year_breakdown("2030-2031").is_err());
    }

    #[test]
    fn test_growth_multiple() {
        let table = sample_table();
        let growth = table
            .growth_multiple("MINISTRY OF DEFENCE", "2014-2015", "2024-2025")
            .unwrap();
        assert!((growth - 3.1).abs() < 1e-9);
    }

    #[test]
    fn test_growth_multiple_missing_endpoint_is_no_data() {
        let table = sample_table();
        assert!(table
            .growth_multiple("MINISTRY OF DEFENCE", "2013-2014", "2024-2025")
            .is_err());
    }

    #[test]
    fn test_share_shift() {
        let table = sample_table();
        // Defence: 20% in 2014-2015, 31% in 2024-2025
        let shift = table
            .share_shift("MINISTRY OF DEFENCE", "2014-2015", "2024-2025")
            .unwrap();
        assert!((shift - 11.0).abs() < 1e-9);
    }
}
