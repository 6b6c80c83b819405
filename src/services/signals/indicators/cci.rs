//! Commodity Channel Index (CCI) indicator.

use crate::services::signals::{finite, require, Indicator, IndicatorError, IndicatorReading};
use crate::types::Candle;

/// CCI (Commodity Channel Index) indicator.
///
/// Measures the current price level relative to an average price level:
/// CCI = (TP - SMA) / (0.015 * Mean Deviation)
/// where TP = Typical Price = (High + Low + Close) / 3
pub struct Cci {
    period: usize,
}

impl Default for Cci {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Cci {
    /// Calculate mean absolute deviation.
    fn mean_deviation(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().map(|v| (v - mean).abs()).sum::<f64>() / values.len() as f64
    }
}

impl Indicator for Cci {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        "cci"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        require(candles, self.period.max(1))?;

        let typical_prices: Vec<f64> = candles[candles.len() - self.period.max(1)..]
            .iter()
            .map(Candle::typical_price)
            .collect();

        let sma = typical_prices.iter().sum::<f64>() / typical_prices.len() as f64;
        let mean_dev = Self::mean_deviation(&typical_prices, sma);
        if mean_dev == 0.0 {
            return Err(IndicatorError::Undefined("zero mean deviation"));
        }

        let current_tp = typical_prices[typical_prices.len() - 1];
        finite((current_tp - sma) / (0.015 * mean_dev))
    }
}
