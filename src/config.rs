//! Environment-driven settings.
//!
//! | Variable                     | Default |
//! |------------------------------|---------|
//! | `RETAIL_DATA_DIR`            | `data`  |
//! | `RETAIL_LOW_STOCK_THRESHOLD` | `10`    |
//! | `RETAIL_PAYMENT_METHOD`      | `Tunai` |
//! | `RETAIL_ACTOR_BUFFER`        | `32`    |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;

use crate::error::ConfigError;
use crate::model::DEFAULT_PAYMENT_METHOD;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;
pub const DEFAULT_ACTOR_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub low_stock_threshold: u32,
    pub default_payment_method: String,
    pub actor_buffer: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            default_payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            actor_buffer: DEFAULT_ACTOR_BUFFER,
        }
    }
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let config = Self::from_lookup(|var| env::var(var).ok())?;
        tracing::info!(data_dir = %config.data_dir.display(), "Application configuration loaded");
        Ok(config)
    }

    /// Builds the config from any variable source. Unset or blank variables take
    /// their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let actor_buffer = parse_or(
            get("RETAIL_ACTOR_BUFFER"),
            "RETAIL_ACTOR_BUFFER",
            defaults.actor_buffer,
        )?;
        if actor_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                var: "RETAIL_ACTOR_BUFFER",
                value: "0".into(),
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            data_dir: get("RETAIL_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            low_stock_threshold: parse_or(
                get("RETAIL_LOW_STOCK_THRESHOLD"),
                "RETAIL_LOW_STOCK_THRESHOLD",
                defaults.low_stock_threshold,
            )?,
            default_payment_method: get("RETAIL_PAYMENT_METHOD")
                .unwrap_or(defaults.default_payment_method),
            actor_buffer,
        })
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

fn parse_or<T>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
            value,
        }),
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
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), Ok(AppConfig::default()));
        let blank = AppConfig::from_lookup(lookup(&[("RETAIL_PAYMENT_METHOD", "  ")])).unwrap();
        assert_eq!(blank.default_payment_method, "Tunai");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RETAIL_DATA_DIR", "/tmp/toko"),
            ("RETAIL_LOW_STOCK_THRESHOLD", "5"),
            ("RETAIL_PAYMENT_METHOD", "QRIS"),
            ("RETAIL_ACTOR_BUFFER", "8"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/toko"));
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.default_payment_method, "QRIS");
        assert_eq!(config.actor_buffer, 8);
    }

    #[test]
    fn test_invalid_values() {
        let err =
            AppConfig::from_lookup(lookup(&[("RETAIL_LOW_STOCK_THRESHOLD", "ten")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "RETAIL_LOW_STOCK_THRESHOLD", .. }));

        let err = AppConfig::from_lookup(lookup(&[("RETAIL_ACTOR_BUFFER", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "RETAIL_ACTOR_BUFFER", .. }));
    }
}
