// Budget Explorer - Core Library
// Cleaning, normalization, and share metrics for India's union budget
// allocations by ministry (2014-2025). Exposes the normalized table, the
// watchlist share table, and formatting helpers to the CLI and the API
// server; chart rendering stays in the presentation layer.

pub mod config;
pub mod format;
pub mod normalize;
pub mod quality;
pub mod record;
pub mod shares;
pub mod store;

// Re-export commonly used types
pub use config::{AliasRule, ExplorerConfig};
pub use format::{format_inr, format_inr_opt, format_percent_opt};
pub use normalize::Normalizer;
pub use quality::{LoadReport, QualityIssue, Severity};
pub use record::{
    normalize_year, parse_amount, NormalizedRecord, RawBudgetRecord, ShareRecord,
};
pub use shares::{SelectionError, ShareCalculator, ShareTable};
pub use store::{BudgetStore, FileFingerprint};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
