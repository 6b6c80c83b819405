//! Augur - candle-driven trading signal core
//!
//! Turns an ordered window of OHLCV candles into an optional trading signal:
//! technical indicators, a fixed feature vector, model or rule-based scoring,
//! ATR risk levels and a confidence gate.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{Result, SignalError};
pub use services::signals::SignalPipeline;
