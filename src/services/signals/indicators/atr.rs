//! Average True Range (ATR) indicator.

use crate::services::signals::{
    finite, mean_of_last, require, true_range, Indicator, IndicatorError, IndicatorReading,
};
use crate::types::Candle;

/// ATR (Average True Range) indicator.
///
/// Simple rolling mean of the true range:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// The first candle has no previous close, so its TR is High-Low.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    /// True range of every candle in order.
    pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
        candles
            .iter()
            .enumerate()
            .map(|(i, c)| true_range(c, i.checked_sub(1).map(|p| &candles[p])))
            .collect()
    }
}

impl Indicator for Atr {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        "atr"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        require(candles, self.period)?;

        let ranges = Self::true_ranges(candles);
        let atr = mean_of_last(&ranges, self.period).ok_or(IndicatorError::Insufficient {
            needed: self.period,
            available: candles.len(),
        })?;

        finite(atr)
    }
}
