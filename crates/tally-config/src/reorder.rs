//! Reorder sheet and report tuning.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_target_multiplier() -> i64 {
    2
}

const fn default_top_items() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderConfig {
    /// Restock target as a multiple of minimum stock.
    #[serde(default = "default_target_multiplier")]
    pub target_multiplier: i64,

    /// Rows kept in the most-used-items report.
    #[serde(default = "default_top_items")]
    pub top_items: usize,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            target_multiplier: default_target_multiplier(),
            top_items: default_top_items(),
        }
    }
}

impl ReorderConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the multiplier is below 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_multiplier < 1 {
            return Err(ConfigError::InvalidValue {
                field: "reorder.target_multiplier".into(),
                reason: format!("must be at least 1, got {}", self.target_multiplier),
            });
        }
        Ok(())
    }
}
