//! # Kiosk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BISTRO_CATALOG=./demos/catalog.json                                │
//! │     BISTRO_DELIVERY_FEE_CENTS=1500                                     │
//! │     BISTRO_QTY_DEFAULT / BISTRO_QTY_MIN / BISTRO_QTY_MAX               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bistro/kiosk.toml (Linux)                                │
//! │     ~/Library/Application Support/com.bistro.bistro/kiosk.toml (macOS) │
//! │     or the path in BISTRO_CONFIG                                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     quantity 1 (1..=9), delivery fee 20.00, catalog.json               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kiosk.toml
//! [store]
//! name = "Nonna Alba's Bistro"
//! currency_symbol = "$"
//!
//! [catalog]
//! path = "/srv/bistro/catalog.json"
//!
//! [engine]
//! delivery_fee = 2000   # cents
//!
//! [engine.quantity]
//! default_value = 1
//! min = 1
//! max = 9
//! ```

use std::path::{Path, PathBuf};

use bistro_core::{EngineConfig, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{KioskError, KioskResult};

// =============================================================================
// Store Settings
// =============================================================================

/// How the kiosk presents itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Shown in the greeting line.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Prefix for every displayed amount.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Bistro".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// Where the product catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            path: default_catalog_path(),
        }
    }
}

// =============================================================================
// Main Kiosk Configuration
// =============================================================================

/// Complete kiosk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Passed unchanged to the storefront.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl KioskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (kiosk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> KioskResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading kiosk config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses one TOML file; missing sections keep their defaults.
    pub fn from_file(path: &Path) -> KioskResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| KioskError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> KioskResult<()> {
        self.engine.validate()?;
        Ok(())
    }

    /// Applies `BISTRO_*` overrides read through `lookup`.
    ///
    /// Values that do not parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BISTRO_CATALOG") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = PathBuf::from(path);
        }

        if let Some(fee) = parse_override(&lookup, "BISTRO_DELIVERY_FEE_CENTS") {
            debug!(fee, "Overriding delivery fee from environment");
            self.engine.delivery_fee = Money::from_cents(fee);
        }

        if let Some(value) = parse_override(&lookup, "BISTRO_QTY_DEFAULT") {
            self.engine.quantity.default_value = value;
        }

        if let Some(value) = parse_override(&lookup, "BISTRO_QTY_MIN") {
            self.engine.quantity.min = value;
        }

        if let Some(value) = parse_override(&lookup, "BISTRO_QTY_MAX") {
            self.engine.quantity.max = value;
        }
    }

    /// Returns the default config file path.
    ///
    /// `BISTRO_CONFIG` wins over the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("BISTRO_CONFIG") {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("com", "bistro", "bistro")
            .map(|dirs| dirs.config_dir().join("kiosk.toml"))
    }

    /// Formats an amount with the store's currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_kiosk::config::KioskConfig;
    /// use bistro_core::Money;
    ///
    /// let config = KioskConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.store.currency_symbol,
            amount.major().abs(),
            amount.cents_part()
        )
    }
}

fn parse_override<F>(lookup: &F, key: &str) -> Option<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring non-numeric environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = KioskConfig::default();
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.catalog.path, PathBuf::from("catalog.json"));
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_sections() {
        let config: KioskConfig = toml::from_str(
            r#"
            [store]
            name = "Nonna Alba's Bistro"

            [engine]
            delivery_fee = 1500

            [engine.quantity]
            max = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Nonna Alba's Bistro");
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.engine.delivery_fee, Money::from_cents(1500));
        assert_eq!(config.engine.quantity.max, 5);
        assert_eq!(config.engine.quantity.min, 1);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = KioskConfig::default();
        config.apply_overrides(lookup(&[
            ("BISTRO_CATALOG", "/srv/catalog.json"),
            ("BISTRO_DELIVERY_FEE_CENTS", "0"),
            ("BISTRO_QTY_MAX", "20"),
        ]));

        assert_eq!(config.catalog.path, PathBuf::from("/srv/catalog.json"));
        assert!(config.engine.delivery_fee.is_zero());
        assert_eq!(config.engine.quantity.max, 20);
    }

    #[test]
    fn test_bad_env_override_ignored() {
        let mut config = KioskConfig::default();
        config.apply_overrides(lookup(&[("BISTRO_QTY_MIN", "one")]));
        assert_eq!(config.engine.quantity.min, 1);
    }

    #[test]
    fn test_config_validation() {
        let mut config = KioskConfig::default();
        config.apply_overrides(lookup(&[("BISTRO_QTY_MIN", "5"), ("BISTRO_QTY_MAX", "2")]));
        assert!(matches!(config.validate(), Err(KioskError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_quantity_max_rejected() {
        let mut config = KioskConfig::default();
        config.apply_overrides(lookup(&[("BISTRO_QTY_MAX", "9223372036854775807")]));
        assert_eq!(config.engine.quantity.max, i64::MAX);
        assert!(matches!(config.validate(), Err(KioskError::InvalidConfig(_))));
    }

    #[test]
    fn test_format_currency() {
        let config = KioskConfig::default();
        assert_eq!(config.format_currency(Money::from_major(79)), "$79.00");
        assert_eq!(config.format_currency(Money::from_cents(5)), "$0.05");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
    }
}
