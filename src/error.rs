use thiserror::Error;

use crate::services::signals::model::ModelError;

/// Signal core error types.
///
/// None of these escape the pipeline boundary: indicator and model errors are
/// logged and degrade to nulls or the rule-based path, while construction
/// errors (bad candles, bad windows) are returned to the caller that built
/// the input.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Invalid candle: {0}")]
    InvalidCandle(String),

    #[error("Invalid candle window: {0}")]
    InvalidWindow(String),

    #[error("Insufficient data for {indicator}: need {needed} candles, have {available}")]
    DataInsufficient {
        indicator: String,
        needed: usize,
        available: usize,
    },

    #[error("Failed to compute {indicator}: {reason}")]
    IndicatorCompute { indicator: String, reason: String },

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Feature build failed: {0}")]
    FeatureBuild(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SignalError>;
