//! Simulation configuration
//!
//! Defaults can be overridden from a JSON file and then from environment
//! variables:
//!   SAVINGS_DEFAULT_TERM_MONTHS, SAVINGS_DEFAULT_MONTHLY_CONTRIBUTION, SAVINGS_TAX_RATE

use crate::error::{ConfigError, ConfigResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Term used when a product carries no usable term
pub const DEFAULT_TERM_MONTHS: u32 = 12;

/// Monthly contribution used when neither caller nor product supplies one
pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 300_000.0;

/// Korean interest income tax (14% income tax + 1.4% local tax)
pub const INTEREST_TAX_RATE: f64 = 0.154;

pub const ENV_TERM_MONTHS: &str = "SAVINGS_DEFAULT_TERM_MONTHS";
pub const ENV_MONTHLY_CONTRIBUTION: &str = "SAVINGS_DEFAULT_MONTHLY_CONTRIBUTION";
pub const ENV_TAX_RATE: &str = "SAVINGS_TAX_RATE";

/// Defaults applied when a product or caller leaves a value unspecified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Term used when the product term is missing or unparseable
    pub default_term_months: u32,

    /// Contribution used when none is passed and the product has no hint
    pub default_monthly_contribution: f64,

    /// Tax rate applied to interest income in summaries
    pub tax_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_term_months: DEFAULT_TERM_MONTHS,
            default_monthly_contribution: DEFAULT_MONTHLY_CONTRIBUTION,
            tax_rate: INTEREST_TAX_RATE,
        }
    }
}

impl SimulationConfig {
    /// Read a config from JSON; omitted fields keep their defaults
    pub fn from_reader<R: Read>(reader: R) -> ConfigResult<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file = File::open(path.as_ref())?;
        let config = Self::from_reader(BufReader::new(file))?;
        info!("Loaded simulation config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(term) = parse_override::<u32, _>(&lookup, ENV_TERM_MONTHS)? {
            self.default_term_months = term;
        }
        if let Some(contribution) = parse_override::<f64, _>(&lookup, ENV_MONTHLY_CONTRIBUTION)? {
            self.default_monthly_contribution = contribution;
        }
        if let Some(rate) = parse_override::<f64, _>(&lookup, ENV_TAX_RATE)? {
            self.tax_rate = rate;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check ranges: positive term, positive finite contribution, tax rate in [0, 1)
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_term_months == 0 {
            return Err(ConfigError::OutOfRange {
                field: "default_term_months",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.default_monthly_contribution.is_finite() || self.default_monthly_contribution <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "default_monthly_contribution",
                reason: format!("must be positive, got {}", self.default_monthly_contribution),
            });
        }
        if !(0.0..1.0).contains(&self.tax_rate) {
            return Err(ConfigError::OutOfRange {
                field: "tax_rate",
                reason: format!("must be in [0, 1), got {}", self.tax_rate),
            });
        }
        Ok(())
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            let value = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
            })?;
            info!("{key} overrides simulation default");
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.default_term_months, 12);
        assert_eq!(config.default_monthly_contribution, 300_000.0);
        assert_eq!(config.tax_rate, 0.154);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimulationConfig::from_reader(r#"{"tax_rate": 0.099}"#.as_bytes()).unwrap();
        assert_eq!(config.tax_rate, 0.099);
        assert_eq!(config.default_term_months, DEFAULT_TERM_MONTHS);
    }

    #[test]
    fn test_overrides_applied() {
        let config = SimulationConfig::default()
            .with_overrides(lookup_from(&[
                (ENV_TERM_MONTHS, "24"),
                (ENV_MONTHLY_CONTRIBUTION, " 500000 "),
            ]))
            .unwrap();
        assert_eq!(config.default_term_months, 24);
        assert_eq!(config.default_monthly_contribution, 500_000.0);
        assert_eq!(config.tax_rate, INTEREST_TAX_RATE);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = SimulationConfig::default()
            .with_overrides(lookup_from(&[(ENV_TERM_MONTHS, "twelve")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = SimulationConfig::default()
            .with_overrides(lookup_from(&[(ENV_TAX_RATE, "1.5")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "tax_rate", .. }));
    }

    #[test]
    fn test_zero_term_rejected() {
        let err = SimulationConfig::from_reader(r#"{"default_term_months": 0}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "default_term_months", .. }));
    }
}
