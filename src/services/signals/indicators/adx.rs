//! Average Directional Index (ADX) indicator.

use crate::services::signals::{
    finite, require, true_range, Indicator, IndicatorError, IndicatorReading,
};
use crate::types::Candle;

/// How ADX is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdxMode {
    /// ADX is always absent.
    #[default]
    Disabled,
    /// Wilder-smoothed ADX.
    Wilder,
}

impl AdxMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "disabled" | "off" | "none" => Some(AdxMode::Disabled),
            "wilder" | "on" => Some(AdxMode::Wilder),
            _ => None,
        }
    }
}

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-40: Trending
/// - Above 40: Strong trend
pub struct Adx {
    period: usize,
    mode: AdxMode,
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(AdxMode::default())
    }
}

impl Adx {
    pub fn new(mode: AdxMode) -> Self {
        Self { period: 14, mode }
    }

    /// Calculate smoothed moving average (Wilder's smoothing).
    fn wilders_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if period == 0 || values.len() < period {
            return Vec::new();
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let mut smoothed = values.iter().take(period).sum::<f64>() / period as f64;
        result.push(smoothed);

        for value in values.iter().skip(period) {
            smoothed = (smoothed * (period - 1) as f64 + value) / period as f64;
            result.push(smoothed);
        }

        result
    }

    fn wilder(&self, candles: &[Candle]) -> IndicatorReading {
        require(candles, self.min_periods())?;

        let mut plus_dm = Vec::with_capacity(candles.len() - 1);
        let mut minus_dm = Vec::with_capacity(candles.len() - 1);
        let mut tr = Vec::with_capacity(candles.len() - 1);

        for pair in candles.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            let up_move = current.high - previous.high;
            let down_move = previous.low - current.low;

            plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
            minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
            tr.push(true_range(current, Some(previous)));
        }

        let smoothed_plus_dm = Self::wilders_smooth(&plus_dm, self.period);
        let smoothed_minus_dm = Self::wilders_smooth(&minus_dm, self.period);
        let smoothed_tr = Self::wilders_smooth(&tr, self.period);

        let dx_values: Vec<f64> = smoothed_tr
            .iter()
            .zip(smoothed_plus_dm.iter().zip(&smoothed_minus_dm))
            .map(|(&atr, (&pdm, &mdm))| {
                if atr == 0.0 {
                    return 0.0;
                }
                let plus_di = pdm / atr * 100.0;
                let minus_di = mdm / atr * 100.0;
                let di_sum = plus_di + minus_di;
                if di_sum > 0.0 {
                    (plus_di - minus_di).abs() / di_sum * 100.0
                } else {
                    0.0
                }
            })
            .collect();

        match Self::wilders_smooth(&dx_values, self.period).last() {
            Some(&adx) => finite(adx),
            None => Err(IndicatorError::Insufficient {
                needed: self.min_periods(),
                available: candles.len(),
            }),
        }
    }
}

impl Indicator for Adx {
    type Output = IndicatorReading;

    fn id(&self) -> &str {
        "adx"
    }

    fn min_periods(&self) -> usize {
        self.period * 2 + 1
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorReading {
        match self.mode {
            AdxMode::Disabled => Err(IndicatorError::Undefined("adx disabled")),
            AdxMode::Wilder => self.wilder(candles),
        }
    }
}
