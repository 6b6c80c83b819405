//! On-Balance Volume (OBV) indicator.

use crate::services::signals::{finite, require, Indicator, IndicatorReading};
use crate::types::Candle;

/// OBV (On-Balance Volume) indicator.
///
/// Cumulative volume over the whole window, starting at 0 on the first candle:
/// - If close > previous close: OBV += volume
/// - If close < previous close: OBV -= volume
/// - Unchanged close: OBV carries over
#[derive(Default)]
pub struct Obv;

impl Obv {
    /// Running OBV for every candle.
    pub fn series(candles: &[Candle]) -> Vec<f64> {
        let mut obv = 0.0;
        let mut values = Vec::with_capacity(candles.len());

        for (i, candle) in candles.iter().enumerate() {
            if let Some(previous) = i.checked_sub(1).map(|p| &candles[p]) {
                if candle.close > previous.close {
                    obv += candle.volume;
                } else if candle.close < previous.close {
                    obv -= candle.volume;
                }
            }
            values.push(obv);
        }

        values
    }
}

impl Indicator for Obv {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        "obv"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        require(candles, 1)?;
        finite(Self::series(candles).last().copied().unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::testing::*;

    #[test]
    fn test_obv_single_candle_is_zero() {
        let candles = create_uptrend_candles(1);
        assert_eq!(Obv.calculate(&candles), Ok(0.0));
    }

    #[test]
    fn test_obv_signed_running_sum() {
        let candles = vec![
            candle(0, 10.0, 11.0, 9.0, 10.0, 5.0),
            candle(1, 10.0, 12.0, 9.0, 11.0, 7.0),
            candle(2, 11.0, 12.0, 9.0, 10.0, 3.0),
            candle(3, 10.0, 12.0, 9.0, 10.0, 100.0),
        ];
        assert_eq!(Obv::series(&candles), vec![0.0, 7.0, 4.0, 4.0]);
        assert_eq!(Obv.calculate(&candles), Ok(4.0));
    }

    #[test]
    fn test_obv_spans_whole_window() {
        let candles = create_uptrend_candles(50);
        assert_eq!(Obv.calculate(&candles), Ok(49.0 * 1000.0));
    }
}
