//! Relative Strength Index (RSI) indicator.

use crate::services::signals::{finite, require, Indicator, IndicatorReading};
use crate::types::Candle;

/// RSI (Relative Strength Index) indicator.
///
/// Ratio of the mean gain to the mean loss over the last `period` close-to-close
/// deltas, mapped onto 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// Uses plain rolling means rather than Wilder smoothing. A window with no
/// movement at all reads 50; one with gains but no losses reads 100.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn calculate_rsi(candles: &[Candle], period: usize) -> IndicatorReading {
        require(candles, period + 1)?;

        let recent = &candles[candles.len() - period - 1..];
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;

        for pair in recent.windows(2) {
            let change = pair[1].close - pair[0].close;
            if change > 0.0 {
                gain_sum += change;
            } else {
                loss_sum -= change;
            }
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        if avg_loss == 0.0 {
            return Ok(if avg_gain == 0.0 { 50.0 } else { 100.0 });
        }

        let rs = avg_gain / avg_loss;
        finite((100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0))
    }
}

impl Indicator for Rsi {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        match self.period {
            14 => "rsi_14",
            7 => "rsi_7",
            _ => "rsi",
        }
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        Self::calculate_rsi(candles, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::testing::*;
    use crate::services::signals::IndicatorError;

    #[test]
    fn test_rsi_id() {
        assert_eq!(Rsi::default().id(), "rsi_14");
        assert_eq!(Rsi::new(7).id(), "rsi_7");
    }

    #[test]
    fn test_rsi_min_periods() {
        assert_eq!(Rsi::default().min_periods(), 15);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let candles = create_uptrend_candles(14);
        assert!(matches!(
            Rsi::default().calculate(&candles),
            Err(IndicatorError::Insufficient { needed: 15, available: 14 })
        ));
    }

    #[test]
    fn test_rsi_uptrend_is_100() {
        let candles = create_uptrend_candles(50);
        assert_eq!(Rsi::default().calculate(&candles), Ok(100.0));
    }

    #[test]
    fn test_rsi_downtrend_is_0() {
        let candles = create_downtrend_candles(50);
        assert_eq!(Rsi::default().calculate(&candles), Ok(0.0));
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let candles = create_flat_candles(30, 100.0, 10.0);
        assert_eq!(Rsi::default().calculate(&candles), Ok(50.0));
    }

    #[test]
    fn test_rsi_known_value() {
        // Deltas over the last 7: +2, -1, +2, -1, +2, -1, +2 -> gains 8, losses 3
        let closes = [50.0, 100.0, 102.0, 101.0, 103.0, 102.0, 104.0, 103.0, 105.0];
        let candles = from_closes(&closes);
        let rsi = Rsi::new(7).calculate(&candles).unwrap();
        assert_approx(rsi, 100.0 - 100.0 / (1.0 + 8.0 / 3.0), 1e-9);
    }

    #[test]
    fn test_rsi_custom_period() {
        let candles = create_uptrend_candles(8);
        assert!(Rsi::new(7).calculate(&candles).is_ok());
    }
}
