// 🗄️ Budget Store - One load, explicit cache, read-only tables
//
// Reads the budget CSV once, runs the normalizer and share calculator,
// and keeps the resulting tables in memory for the process lifetime. The
// cache key is the input file's identity (SHA-256 of its bytes plus the
// modification time); `refresh()` re-checks that fingerprint and reloads
// only when it changed, replacing the original's implicit memoization
// with an explicit, invalidatable cache.
//
// A missing or unparseable file is fatal at load time. Post-load the
// tables are never mutated, so a store behind an Arc is safe to share
// across request-handling threads without locking.

use crate::config::ExplorerConfig;
use crate::normalize::Normalizer;
use crate::quality::LoadReport;
use crate::record::{NormalizedRecord, RawBudgetRecord};
use crate::shares::{ShareCalculator, ShareTable};
use anyhow::{Context as AnyhowContext, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// ============================================================================
// FILE FINGERPRINT
// ============================================================================

/// Identity of the loaded file: content hash + modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFingerprint {
    pub sha256: String,
    pub modified: Option<SystemTime>,
}

impl FileFingerprint {
    fn of(path: &Path, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let sha256 = format!("{:x}", hasher.finalize());

        let modified = fs::metadata(path).ok().and_then(|m| m.modified().ok());

        FileFingerprint { sha256, modified }
    }
}

// ============================================================================
// BUDGET STORE
// ============================================================================

pub struct BudgetStore {
    csv_path: PathBuf,
    config: ExplorerConfig,
    fingerprint: FileFingerprint,
    normalized: Vec<NormalizedRecord>,
    shares: ShareTable,
    report: LoadReport,
}

impl BudgetStore {
    /// Load, clean, and derive everything from the CSV at `csv_path`.
    ///
    /// Fatal when the file is absent or not parseable as the expected
    /// table - no partial tables are ever exposed.
    pub fn open<P: AsRef<Path>>(csv_path: P, config: ExplorerConfig) -> Result<Self> {
        let csv_path = csv_path.as_ref().to_path_buf();
        let bytes = fs::read(&csv_path)
            .with_context(|| format!("Failed to read budget CSV: {:?}", csv_path))?;
        let fingerprint = FileFingerprint::of(&csv_path, &bytes);

        let (normalized, shares, report) = build_tables(&bytes, &config)
            .with_context(|| format!("Failed to load budget CSV: {:?}", csv_path))?;

        Ok(BudgetStore {
            csv_path,
            config,
            fingerprint,
            normalized,
            shares,
            report,
        })
    }

    /// Re-check the file's fingerprint and reload if it changed.
    ///
    /// Returns `true` when a reload happened. An unchanged file is a
    /// cheap no-op; a file that changed into something unparseable is an
    /// error and the previous tables stay in place.
    pub fn refresh(&mut self) -> Result<bool> {
        let bytes = fs::read(&self.csv_path)
            .with_context(|| format!("Failed to re-read budget CSV: {:?}", self.csv_path))?;
        let fingerprint = FileFingerprint::of(&self.csv_path, &bytes);

        if fingerprint == self.fingerprint {
            return Ok(false);
        }

        let (normalized, shares, report) = build_tables(&bytes, &self.config)
            .with_context(|| format!("Failed to reload budget CSV: {:?}", self.csv_path))?;

        self.fingerprint = fingerprint;
        self.normalized = normalized;
        self.shares = shares;
        self.report = report;
        Ok(true)
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn fingerprint(&self) -> &FileFingerprint {
        &self.fingerprint
    }

    /// The full normalized table (all ministries, not just the watchlist).
    pub fn normalized(&self) -> &[NormalizedRecord] {
        &self.normalized
    }

    /// The watchlist-filtered, share-annotated table.
    pub fn shares(&self) -> &ShareTable {
        &self.shares
    }

    /// What the cleaning pass had to do during the load.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Parse + normalize + derive, from raw bytes. Split out so `open` and
/// `refresh` share one code path.
fn build_tables(
    bytes: &[u8],
    config: &ExplorerConfig,
) -> Result<(Vec<NormalizedRecord>, ShareTable, LoadReport)> {
    let mut reader = csv::Reader::from_reader(bytes);

    // A file without the expected header row is not this table; refuse it
    // instead of silently loading zero rows.
    let headers = reader.headers().context("Failed to read CSV header row")?;
    for required in [
        "Ministry Name",
        "Year",
        "Total (Plan)",
        "Total Plan & Non-Plan",
    ] {
        if !headers.iter().any(|h| h.trim() == required) {
            anyhow::bail!("CSV is missing required column: {:?}", required);
        }
    }

    let mut raw_records: Vec<RawBudgetRecord> = Vec::new();
    for result in reader.deserialize() {
        let record: RawBudgetRecord = result.context("Failed to deserialize budget row")?;
        raw_records.push(record);
    }

    let normalizer = Normalizer::new(config);
    let normalized = normalizer.normalize(&raw_records);
    let report = LoadReport::build(&raw_records, &normalized, config);

    let calculator = ShareCalculator::new(&config.watchlist);
    let shares = ShareTable::new(calculator.compute(&normalized));

    Ok((normalized, shares, report))
}

// ============================================================================
// TESTS
// ============================================================================
