// ⚙️ Explorer Configuration - Mapping table + watchlist as data
//
// The ministry alias table and the five-ministry watchlist used to be
// inline constants in the dashboard script. Here they are an external,
// editable JSON document so the normalizer and the share calculator are
// parameterized and independently testable. The defaults carry the known
// values for the 2014-2025 dataset.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// ALIAS RULE
// ============================================================================

/// One known spelling variant and the canonical spelling it maps to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasRule {
    /// Spelling as it appears in some rows of the source file
    pub variant: String,

    /// Canonical spelling used as the join key everywhere downstream
    pub canonical: String,
}

// ============================================================================
// EXPLORER CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Known spelling variants -> canonical ministry names
    pub ministry_aliases: Vec<AliasRule>,

    /// Fixed set of ministries tracked for comparative share analysis
    pub watchlist: Vec<String>,
}

impl ExplorerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: ExplorerConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Write configuration to a JSON file (pretty-printed, hand-editable)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            ministry_aliases: vec![
                AliasRule {
                    variant: "MINISTRY OF AGRICULTURE AND FARMERS WELFARE".to_string(),
                    canonical: "MINISTRY OF AGRICULTURE AND FARMERS' WELFARE".to_string(),
                },
                AliasRule {
                    variant: "MINISTRY OF AGRICULTURE".to_string(),
                    canonical: "MINISTRY OF AGRICULTURE AND FARMERS' WELFARE".to_string(),
                },
            ],
            watchlist: vec![
                "MINISTRY OF DEFENCE".to_string(),
                "MINISTRY OF FINANCE".to_string(),
                "MINISTRY OF HOME AFFAIRS".to_string(),
                "MINISTRY OF AGRICULTURE AND FARMERS' WELFARE".to_string(),
                "MINISTRY OF HEALTH AND FAMILY WELFARE".to_string(),
            ],
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_watchlist_has_five_ministries() {
        let config = ExplorerConfig::default();
        assert_eq!(config.watchlist.len(), 5);
        assert!(config
            .watchlist
            .contains(&"MINISTRY OF DEFENCE".to_string()));
    }

    #[test]
    fn test_default_aliases_target_canonical_agriculture() {
        let config = ExplorerConfig::default();
        for rule in &config.ministry_aliases {
            assert_eq!(
                rule.canonical,
                "MINISTRY OF AGRICULTURE AND FARMERS' WELFARE"
            );
        }
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = ExplorerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ExplorerConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.watchlist, config.watchlist);
        assert_eq!(
            parsed.ministry_aliases.len(),
            config.ministry_aliases.len()
        );
    }

    #[test]
    fn test_from_file_missing_path_is_error() {
        let result = ExplorerConfig::from_file("does/not/exist.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_then_load_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("budget-explorer-config-{}.json", std::process::id()));

        let config = ExplorerConfig::default();
        config.save_to_file(&path).unwrap();
        let loaded = ExplorerConfig::from_file(&path).unwrap();

        assert_eq!(loaded.watchlist, config.watchlist);
        fs::remove_file(path).ok();
    }
}
