//! Candle-to-signal scoring pipeline.
//!
//! Indicator calculation, feature encoding, model/rule scoring, risk levels
//! and the confidence gate. Every stage is a plain value owned by
//! [`SignalPipeline`]; none of them hold hidden global state.

pub mod engine;
pub mod features;
pub mod gate;
pub mod indicators;
pub mod model;
pub mod pipeline;
pub mod predictor;
pub mod risk;

pub use engine::IndicatorEngine;
pub use features::FeatureEncoder;
pub use gate::{EntryContext, GateConfig, PredictionGate};
pub use indicators::AdxMode;
pub use model::{
    Classifier, FeatureScaler, FileModelSource, LinearClassifier, ModelBundle, ModelError,
    ModelSource, NoModelSource, StandardScaler,
};
pub use pipeline::SignalPipeline;
pub use predictor::SignalPredictor;
pub use risk::{RiskLevelCalculator, RiskLevels};

use crate::error::SignalError;
use crate::types::Candle;
use thiserror::Error;

/// Why an indicator has no value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    /// Window shorter than the indicator needs. Expected, not a failure.
    #[error("need {needed} candles, have {available}")]
    Insufficient { needed: usize, available: usize },

    /// Mathematically undefined for this data (flat range, zero deviation)
    /// or switched off by configuration. Expected, not a failure.
    #[error("undefined: {0}")]
    Undefined(&'static str),

    /// The computation produced NaN or infinity.
    #[error("non-finite result")]
    NonFinite,
}

impl IndicatorError {
    /// Whether this is a genuine compute failure rather than legitimate absence.
    pub fn is_failure(&self) -> bool {
        matches!(self, IndicatorError::NonFinite)
    }

    /// Attach the indicator name for logging or propagation.
    pub fn into_signal_error(self, indicator: &str) -> SignalError {
        match self {
            IndicatorError::Insufficient { needed, available } => SignalError::DataInsufficient {
                indicator: indicator.to_string(),
                needed,
                available,
            },
            other => SignalError::IndicatorCompute {
                indicator: indicator.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Outcome of a single indicator value.
pub type IndicatorReading = Result<f64, IndicatorError>;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// What one calculation yields: a single reading or a group of them.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Minimum number of candles required for a value.
    fn min_periods(&self) -> usize;

    /// Calculate from candles ordered oldest first.
    fn calculate(&self, candles: &[Candle]) -> Self::Output;
}

/// Fail with `Insufficient` unless at least `needed` candles are present.
pub(crate) fn require(candles: &[Candle], needed: usize) -> Result<(), IndicatorError> {
    if candles.len() < needed || candles.is_empty() {
        return Err(IndicatorError::Insufficient {
            needed: needed.max(1),
            available: candles.len(),
        });
    }
    Ok(())
}

/// Reject NaN and infinities.
pub(crate) fn finite(value: f64) -> IndicatorReading {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IndicatorError::NonFinite)
    }
}

/// Mean of the trailing `period` values.
pub(crate) fn mean_of_last(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    Some(values[values.len() - period..].iter().sum::<f64>() / period as f64)
}

/// True range against the previous candle; the first candle uses high - low.
pub(crate) fn true_range(current: &Candle, previous: Option<&Candle>) -> f64 {
    let hl = current.high - current.low;
    match previous {
        Some(previous) => {
            let hc = (current.high - previous.close).abs();
            let lc = (current.low - previous.close).abs();
            hl.max(hc).max(lc)
        }
        None => hl,
    }
}
