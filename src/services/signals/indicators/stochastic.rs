//! Stochastic Oscillator indicator.

use crate::services::signals::{finite, require, Indicator, IndicatorError, IndicatorReading};
use crate::types::Candle;

/// Stochastic Oscillator.
///
/// Compares closing price to price range over a period:
/// %K = (Current Close - Lowest Low) / (Highest High - Lowest Low) * 100
/// %D = mean of the last `d_period` %K values
///
/// A flat range leaves %K undefined, and any undefined %K inside the %D
/// window leaves %D undefined too.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

/// Current %K and %D.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticReading {
    pub k: IndicatorReading,
    pub d: IndicatorReading,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

/// Highest high and lowest low of a candle slice.
pub(crate) fn price_range(candles: &[Candle]) -> (f64, f64) {
    let highest = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let lowest = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    (highest, lowest)
}

impl Stochastic {
    /// %K for the candle at `end` (inclusive), looking back `k_period` candles.
    fn k_at(&self, candles: &[Candle], end: usize) -> IndicatorReading {
        let window = &candles[end + 1 - self.k_period..=end];
        let (highest_high, lowest_low) = price_range(window);

        if highest_high == lowest_low {
            return Err(IndicatorError::Undefined("flat price range"));
        }

        finite((candles[end].close - lowest_low) / (highest_high - lowest_low) * 100.0)
    }
}

impl Indicator for Stochastic {
    type Output = StochasticReading;

    fn id(&self) -> &str {
        "stochastic"
    }

    fn min_periods(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn calculate(&self, candles: &[Candle]) -> StochasticReading {
        if let Err(err) = require(candles, self.k_period.max(1)) {
            return StochasticReading {
                k: Err(err.clone()),
                d: Err(err),
            };
        }

        let last = candles.len() - 1;
        let k = self.k_at(candles, last);

        let d = require(candles, self.min_periods()).and_then(|_| {
            let mut sum = 0.0;
            for end in (last + 1 - self.d_period)..=last {
                sum += self.k_at(candles, end)?;
            }
            finite(sum / self.d_period as f64)
        });

        StochasticReading { k, d }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::testing::*;

    #[test]
    fn test_stochastic_min_periods() {
        assert_eq!(Stochastic::default().min_periods(), 16);
    }

    #[test]
    fn test_stochastic_k_without_d() {
        let candles = create_uptrend_candles(14);
        let reading = Stochastic::default().calculate(&candles);
        assert!(reading.k.is_ok());
        assert!(matches!(reading.d, Err(IndicatorError::Insufficient { .. })));
    }

    #[test]
    fn test_stochastic_insufficient_data() {
        let candles = create_uptrend_candles(10);
        let reading = Stochastic::default().calculate(&candles);
        assert!(reading.k.is_err());
        assert!(reading.d.is_err());
    }

    #[test]
    fn test_stochastic_uptrend_high_k() {
        let candles = create_uptrend_candles(30);
        let reading = Stochastic::default().calculate(&candles);
        let k = reading.k.unwrap();
        assert!(k > 50.0 && k <= 100.0, "%K in uptrend should be high, got {}", k);
        let d = reading.d.unwrap();
        assert!((0.0..=100.0).contains(&d));
    }

    #[test]
    fn test_stochastic_flat_range_undefined() {
        let candles = create_flat_candles(20, 100.0, 1.0);
        let reading = Stochastic::default().calculate(&candles);
        assert_eq!(reading.k, Err(IndicatorError::Undefined("flat price range")));
        assert!(reading.d.is_err());
    }
}
