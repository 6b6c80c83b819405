//! Simple Moving Average (SMA) indicator.

use crate::services::signals::{
    finite, mean_of_last, require, Indicator, IndicatorError, IndicatorReading,
};
use crate::types::Candle;

/// SMA (Simple Moving Average) indicator.
///
/// Calculates the average close over the trailing period.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        match self.period {
            20 => "sma_20",
            50 => "sma_50",
            200 => "sma_200",
            _ => "sma",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        require(candles, self.period)?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let sma = mean_of_last(&closes, self.period).ok_or(IndicatorError::Insufficient {
            needed: self.period,
            available: candles.len(),
        })?;

        finite(sma)
    }
}
