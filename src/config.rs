use crate::error::{Result, SignalError};
use crate::services::signals::{AdxMode, GateConfig};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Model artifact configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Artifact version; resolves to `model_v{version}.json`.
    pub version: String,
    /// Directory holding model and scaler artifacts.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            path: PathBuf::from("./models"),
        }
    }
}

/// Signal core configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model: ModelConfig,
    /// Minimum confidence (0-100) to emit a signal.
    pub min_confidence: f64,
    /// Windows shorter than this produce no signal.
    pub min_candles: usize,
    /// Only the most recent candles up to this count are scored.
    pub max_history: usize,
    /// Signal lifetime in hours.
    pub horizon_hours: u32,
    /// Recommended position size (% of equity).
    pub position_size_pct: f64,
    pub adx_mode: AdxMode,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ModelConfig::default();

        Self {
            model: ModelConfig {
                version: env::var("MODEL_VERSION").unwrap_or(defaults.version),
                path: env::var("MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.path),
            },
            min_confidence: env_or("MIN_CONFIDENCE_THRESHOLD", 70.0),
            min_candles: env_or("MIN_CANDLES_FOR_INDICATORS", 50),
            max_history: env_or("MAX_CANDLES_HISTORY", 500),
            horizon_hours: env_or("SIGNAL_HORIZON_HOURS", 24),
            position_size_pct: env_or("POSITION_SIZE_PCT", 5.0),
            adx_mode: parse_or(
                "ADX_MODE",
                env::var("ADX_MODE").ok(),
                AdxMode::default(),
                AdxMode::from_str,
            ),
        }
    }

    /// Gate settings derived from this config.
    pub fn gate(&self) -> GateConfig {
        GateConfig {
            min_confidence: self.min_confidence,
            horizon_hours: self.horizon_hours,
            position_size_pct: self.position_size_pct,
        }
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.model.version.trim().is_empty() {
            return Err(SignalError::Config("MODEL_VERSION is empty".to_string()));
        }
        if !(0.0..=100.0).contains(&self.min_confidence) {
            return Err(SignalError::Config(format!(
                "MIN_CONFIDENCE_THRESHOLD must be within 0-100, got {}",
                self.min_confidence
            )));
        }
        if self.min_candles == 0 {
            return Err(SignalError::Config(
                "MIN_CANDLES_FOR_INDICATORS must be at least 1".to_string(),
            ));
        }
        if self.max_history < self.min_candles {
            return Err(SignalError::Config(format!(
                "MAX_CANDLES_HISTORY ({}) is below MIN_CANDLES_FOR_INDICATORS ({})",
                self.max_history, self.min_candles
            )));
        }
        if self.horizon_hours == 0 {
            return Err(SignalError::Config(
                "SIGNAL_HORIZON_HOURS must be positive".to_string(),
            ));
        }
        if !(self.position_size_pct > 0.0 && self.position_size_pct <= 100.0) {
            return Err(SignalError::Config(format!(
                "POSITION_SIZE_PCT must be within (0, 100], got {}",
                self.position_size_pct
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(key, env::var(key).ok(), default, |v| v.trim().parse().ok())
}

/// Parse `raw` when present, warning and falling back to `default` if it is malformed.
fn parse_or<T>(key: &str, raw: Option<String>, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    match raw {
        None => default,
        Some(value) => parse(&value).unwrap_or_else(|| {
            warn!("Invalid {}={:?}, using default", key, value);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            model: ModelConfig::default(),
            min_confidence: 70.0,
            min_candles: 50,
            max_history: 500,
            horizon_hours: 24,
            position_size_pct: 5.0,
            adx_mode: AdxMode::Disabled,
        }
    }

    #[test]
    fn test_model_config_defaults() {
        let model = ModelConfig::default();
        assert_eq!(model.version, "1.0");
        assert_eq!(model.path, PathBuf::from("./models"));
    }

    #[test]
    fn test_parse_or() {
        let parse = |v: &str| v.parse::<usize>().ok();
        assert_eq!(parse_or("N", None, 50, parse), 50);
        assert_eq!(parse_or("N", Some("120".to_string()), 50, parse), 120);
        assert_eq!(parse_or("N", Some("lots".to_string()), 50, parse), 50);
        assert_eq!(
            parse_or("ADX_MODE", Some("wilder".to_string()), AdxMode::Disabled, AdxMode::from_str),
            AdxMode::Wilder
        );
    }

    #[test]
    fn test_validate_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut bad = config();
        bad.min_confidence = 120.0;
        assert!(matches!(bad.validate(), Err(SignalError::Config(_))));

        let mut bad = config();
        bad.max_history = 10;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.min_candles = 0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.position_size_pct = 0.0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.horizon_hours = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_gate_config() {
        let mut cfg = config();
        cfg.min_confidence = 80.0;
        let gate = cfg.gate();
        assert_eq!(gate.min_confidence, 80.0);
        assert_eq!(gate.horizon_hours, 24);
        assert_eq!(gate.position_size_pct, 5.0);
    }
}
