//! Williams %R indicator.

use super::stochastic::price_range;
use crate::services::signals::{finite, require, Indicator, IndicatorError, IndicatorReading};
use crate::types::Candle;

/// Williams %R.
///
/// -100 * (Highest High - Close) / (Highest High - Lowest Low), ranging from
/// -100 (close at the low) to 0 (close at the high).
pub struct WilliamsR {
    period: usize,
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Indicator for WilliamsR {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        "willr"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        require(candles, self.period.max(1))?;

        let window = &candles[candles.len() - self.period.max(1)..];
        let (highest_high, lowest_low) = price_range(window);
        if highest_high == lowest_low {
            return Err(IndicatorError::Undefined("flat price range"));
        }

        let close = candles[candles.len() - 1].close;
        finite(-100.0 * (highest_high - close) / (highest_high - lowest_low))
    }
}
