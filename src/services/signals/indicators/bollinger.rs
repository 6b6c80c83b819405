//! Bollinger Bands indicator.

use crate::services::signals::{finite, require, Indicator, IndicatorError, IndicatorReading};
use crate::types::Candle;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
/// - Width: (Upper - Lower) / Middle * 100
///
/// StdDev is the sample standard deviation of the last `period` closes.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

/// Current band values.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerReading {
    pub upper: IndicatorReading,
    pub middle: IndicatorReading,
    pub lower: IndicatorReading,
    pub width: IndicatorReading,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    /// Sample standard deviation (n - 1 denominator).
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerReading;

    fn id(&self) -> &str {
        "bollinger"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> BollingerReading {
        if let Err(err) = require(candles, self.period) {
            return BollingerReading {
                upper: Err(err.clone()),
                middle: Err(err.clone()),
                lower: Err(err.clone()),
                width: Err(err),
            };
        }

        let closes: Vec<f64> = candles[candles.len() - self.period..]
            .iter()
            .map(|c| c.close)
            .collect();

        let middle = closes.iter().sum::<f64>() / self.period as f64;
        let std_dev = Self::std_dev(&closes, middle);

        let upper = middle + self.std_dev_multiplier * std_dev;
        let lower = middle - self.std_dev_multiplier * std_dev;

        let width = if middle == 0.0 {
            Err(IndicatorError::Undefined("zero middle band"))
        } else {
            finite((upper - lower) / middle * 100.0)
        };

        BollingerReading {
            upper: finite(upper),
            middle: finite(middle),
            lower: finite(lower),
            width,
        }
    }
}
