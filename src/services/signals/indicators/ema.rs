//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::{finite, require, Indicator, IndicatorError, IndicatorReading};
use crate::types::Candle;

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Smoothing factor is
/// `2 / (span + 1)` and the recurrence is seeded with the first close, so
/// the whole window contributes.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// EMA of every prefix of `values`, seeded with `values[0]`.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut ema = Vec::with_capacity(values.len());
    let mut current = first;
    ema.push(current);

    for value in &values[1..] {
        current = (value - current) * alpha + current;
        ema.push(current);
    }

    ema
}

impl Indicator for Ema {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        match self.period {
            9 => "ema_9",
            20 => "ema_20",
            50 => "ema_50",
            100 => "ema_100",
            200 => "ema_200",
            _ => "ema",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        require(candles, self.period)?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let ema = ema_series(&closes, self.period)
            .last()
            .copied()
            .ok_or(IndicatorError::NonFinite)?;

        finite(ema)
    }
}
