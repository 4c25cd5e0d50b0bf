//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

fn default_shop_location() -> String {
    "shop".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Name recorded as `created_by` / `moved_by` when `--as` is not given.
    #[serde(default)]
    pub operator: String,

    /// Location name tools return to.
    #[serde(default = "default_shop_location")]
    pub shop_location: String,

    /// Directory for CSV and HTML exports. Empty means the current directory.
    #[serde(default)]
    pub export_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            operator: String::new(),
            shop_location: default_shop_location(),
            export_dir: String::new(),
        }
    }
}

impl GeneralConfig {
    /// Configured operator, if any.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        let trimmed = self.operator.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
