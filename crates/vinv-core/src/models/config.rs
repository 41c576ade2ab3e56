//! Parser tuning knobs with JSON file round-trip.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, VinvError};

/// Configuration for the vendor parsers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum difference tolerated between summed line-item totals and the
    /// printed order total before a reconciliation warning is raised.
    pub reconcile_tolerance: Decimal,

    /// Description fragments kept in the scan buffer; the oldest is dropped
    /// once the buffer is full.
    pub fragment_cap: usize,

    /// Lines after an emitted item during which trailing SKU/attribute
    /// lines and loose continuations still attach to it.
    pub post_item_window: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            reconcile_tolerance: Decimal::new(5, 2),
            fragment_cap: 6,
            post_item_window: 3,
        }
    }
}

impl ParseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| VinvError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| VinvError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.reconcile_tolerance, Decimal::new(5, 2));
        assert_eq!(config.fragment_cap, 6);
        assert_eq!(config.post_item_window, 3);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ParseConfig = serde_json::from_str(r#"{"fragment_cap": 10}"#).unwrap();
        assert_eq!(config.fragment_cap, 10);
        assert_eq!(config.post_item_window, 3);
    }
}
