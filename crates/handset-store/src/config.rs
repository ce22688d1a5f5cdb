//! # Shop Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     HANDSET_TAX_RATE_BPS=825                                           │
//! │     HANDSET_FIXTURES_DIR=./fixtures                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/handset-pos/handset.toml (Linux)                         │
//! │     ~/Library/Application Support/com.handset.pos/handset.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [shop]
//! name = "Handset Corner"
//! currency = "USD"
//! tax_rate_bps = 800
//!
//! [inventory]
//! low_stock_threshold = 10
//! critical_stock_level = 5
//!
//! [reorder]
//! window_days = 30
//! cover_days = 30
//! reorder_threshold_days = 30
//! high_priority_days = 14
//!
//! [insights]
//! trade_in_buckets = 15
//! clv_limit = 10
//! top_products = 5
//! lookback_days = 90
//! recent_sales = 5
//!
//! [fixtures]
//! dir = "/srv/handset/fixtures"
//! ```

use std::path::{Path, PathBuf};

use handset_core::reorder::ReorderPolicy;
use handset_core::TaxRate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSettings {
    #[serde(default = "default_shop_name")]
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Register tax rate in basis points.
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_shop_name() -> String {
    "Handset POS".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_tax_rate_bps() -> u32 {
    800
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            name: default_shop_name(),
            currency: default_currency(),
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Threshold for the dashboard's low-stock count.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default = "default_critical_stock_level")]
    pub critical_stock_level: i64,
}

fn default_low_stock_threshold() -> i64 {
    handset_core::DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_critical_stock_level() -> i64 {
    handset_core::DEFAULT_CRITICAL_STOCK_LEVEL
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            low_stock_threshold: default_low_stock_threshold(),
            critical_stock_level: default_critical_stock_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderSettings {
    #[serde(default = "default_thirty")]
    pub window_days: u32,
    #[serde(default = "default_thirty")]
    pub cover_days: u32,
    #[serde(default = "default_thirty")]
    pub reorder_threshold_days: u32,
    #[serde(default = "default_high_priority_days")]
    pub high_priority_days: u32,
}

fn default_thirty() -> u32 {
    30
}

fn default_high_priority_days() -> u32 {
    14
}

impl Default for ReorderSettings {
    fn default() -> Self {
        let policy = ReorderPolicy::default();
        ReorderSettings {
            window_days: policy.window_days,
            cover_days: policy.cover_days,
            reorder_threshold_days: policy.reorder_threshold_days,
            high_priority_days: policy.high_priority_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSettings {
    #[serde(default = "default_trade_in_buckets")]
    pub trade_in_buckets: u32,
    #[serde(default = "default_clv_limit")]
    pub clv_limit: usize,
    #[serde(default = "default_top_products")]
    pub top_products: usize,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    /// Sales shown on the dashboard.
    #[serde(default = "default_recent_sales")]
    pub recent_sales: usize,
}

fn default_trade_in_buckets() -> u32 {
    15
}

fn default_clv_limit() -> usize {
    10
}

fn default_top_products() -> usize {
    5
}

fn default_lookback_days() -> u32 {
    90
}

fn default_recent_sales() -> usize {
    5
}

impl Default for InsightSettings {
    fn default() -> Self {
        InsightSettings {
            trade_in_buckets: default_trade_in_buckets(),
            clv_limit: default_clv_limit(),
            top_products: default_top_products(),
            lookback_days: default_lookback_days(),
            recent_sales: default_recent_sales(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureSettings {
    /// Directory holding `customers.json`, `devices.json`, ... that
    /// replaces the embedded data set. Missing files fall back to the
    /// embedded ones.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// =============================================================================
// Shop Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub shop: ShopSettings,
    #[serde(default)]
    pub inventory: InventorySettings,
    #[serde(default)]
    pub reorder: ReorderSettings,
    #[serde(default)]
    pub insights: InsightSettings,
    #[serde(default)]
    pub fixtures: FixtureSettings,
}

impl ShopConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path`, else the platform config directory
    /// 3. `HANDSET_*` environment variables
    ///
    /// An explicit path that does not exist is an error. A missing file in
    /// the platform directory just means defaults.
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(StoreError::ConfigLoadFailed(format!(
                        "{} does not exist",
                        path.display()
                    )));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> StoreResult<Self> {
        info!(?path, "Loading shop config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses a TOML document. Absent sections and keys take defaults.
    pub fn from_toml(contents: &str) -> StoreResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Rejects settings the analytics cannot work with.
    pub fn validate(&self) -> StoreResult<()> {
        if self.shop.tax_rate_bps > 10_000 {
            return Err(StoreError::InvalidConfig(format!(
                "tax_rate_bps must be at most 10000, got {}",
                self.shop.tax_rate_bps
            )));
        }

        if self.inventory.low_stock_threshold < 0 || self.inventory.critical_stock_level < 0 {
            return Err(StoreError::InvalidConfig(
                "stock thresholds must not be negative".into(),
            ));
        }

        let reorder = &self.reorder;
        if reorder.window_days == 0 || reorder.cover_days == 0 || reorder.reorder_threshold_days == 0 {
            return Err(StoreError::InvalidConfig(
                "reorder windows must be greater than 0".into(),
            ));
        }

        if reorder.high_priority_days > reorder.reorder_threshold_days {
            return Err(StoreError::InvalidConfig(format!(
                "high_priority_days ({}) must not exceed reorder_threshold_days ({})",
                reorder.high_priority_days, reorder.reorder_threshold_days
            )));
        }

        if self.insights.trade_in_buckets == 0 {
            return Err(StoreError::InvalidConfig(
                "trade_in_buckets must be greater than 0".into(),
            ));
        }

        if self.insights.lookback_days == 0 {
            return Err(StoreError::InvalidConfig(
                "lookback_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `HANDSET_*` overrides from the process environment.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable values are logged
    /// and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("HANDSET_SHOP_NAME") {
            self.shop.name = name;
        }

        if let Some(currency) = lookup("HANDSET_CURRENCY") {
            self.shop.currency = currency;
        }

        if let Some(value) = lookup("HANDSET_TAX_RATE_BPS") {
            match value.parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding tax rate from environment");
                    self.shop.tax_rate_bps = bps;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid HANDSET_TAX_RATE_BPS"),
            }
        }

        if let Some(value) = lookup("HANDSET_LOW_STOCK_THRESHOLD") {
            match value.parse::<i64>() {
                Ok(threshold) => self.inventory.low_stock_threshold = threshold,
                Err(_) => warn!(value = %value, "Ignoring invalid HANDSET_LOW_STOCK_THRESHOLD"),
            }
        }

        if let Some(value) = lookup("HANDSET_REORDER_WINDOW_DAYS") {
            match value.parse::<u32>() {
                Ok(days) => self.reorder.window_days = days,
                Err(_) => warn!(value = %value, "Ignoring invalid HANDSET_REORDER_WINDOW_DAYS"),
            }
        }

        if let Some(value) = lookup("HANDSET_LOOKBACK_DAYS") {
            match value.parse::<u32>() {
                Ok(days) => self.insights.lookback_days = days,
                Err(_) => warn!(value = %value, "Ignoring invalid HANDSET_LOOKBACK_DAYS"),
            }
        }

        if let Some(dir) = lookup("HANDSET_FIXTURES_DIR") {
            debug!(dir = %dir, "Overriding fixtures directory from environment");
            self.fixtures.dir = Some(PathBuf::from(dir));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "handset", "pos")
            .map(|dirs| dirs.config_dir().join("handset.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.shop.tax_rate_bps)
    }

    pub fn reorder_policy(&self) -> ReorderPolicy {
        ReorderPolicy {
            window_days: self.reorder.window_days,
            cover_days: self.reorder.cover_days,
            reorder_threshold_days: self.reorder.reorder_threshold_days,
            high_priority_days: self.reorder.high_priority_days,
        }
    }
}
