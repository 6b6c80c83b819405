//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;
use crate::services::signals::{finite, require, Indicator, IndicatorError, IndicatorReading};
use crate::types::Candle;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// All three EMAs are seeded from the start of their input series.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

/// Current MACD line, signal line and histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdReading {
    pub macd: IndicatorReading,
    pub signal: IndicatorReading,
    pub histogram: IndicatorReading,
}

impl MacdReading {
    fn unavailable(err: IndicatorError) -> Self {
        Self {
            macd: Err(err.clone()),
            signal: Err(err.clone()),
            histogram: Err(err),
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdReading;

    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period.max(self.fast_period)
    }

    fn calculate(&self, candles: &[Candle]) -> MacdReading {
        if let Err(err) = require(candles, self.min_periods()) {
            return MacdReading::unavailable(err);
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast_ema = ema_series(&closes, self.fast_period);
        let slow_ema = ema_series(&closes, self.slow_period);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();
        let signal_line = ema_series(&macd_line, self.signal_period);

        let (Some(&macd), Some(&signal)) = (macd_line.last(), signal_line.last()) else {
            return MacdReading::unavailable(IndicatorError::NonFinite);
        };

        let macd = finite(macd);
        let signal = finite(signal);
        let histogram = match (&macd, &signal) {
            (Ok(m), Ok(s)) => finite(m - s),
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };

        MacdReading {
            macd,
            signal,
            histogram,
        }
    }
}
