//! Feature encoder: window, snapshot and market context into a fixed vector.

use crate::types::{CandleWindow, FeatureVector, IndicatorSnapshot, MarketContext, FEATURE_COUNT};

/// Neutral value for oscillators and context fields bounded in [0, 100].
const NEUTRAL_OSCILLATOR: f64 = 50.0;

/// Encodes a scoring input into a [`FeatureVector`].
///
/// Total over typed inputs: missing indicators and context take neutral
/// defaults, and anything non-finite is written as 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn encode(
        &self,
        window: &CandleWindow,
        snapshot: &IndicatorSnapshot,
        context: Option<&MarketContext>,
    ) -> FeatureVector {
        let candles = window.candles();
        let last = window.last();
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        let values: [f64; FEATURE_COUNT] = [
            // Price
            pct_change_back(&closes, 1),
            pct_change_back(&closes, 5),
            ratio_or_one(last.high, last.low),
            ratio_or_one(last.close, last.open),
            // Trend
            cross(snapshot.ema_20, snapshot.ema_50),
            cross(snapshot.ema_50, snapshot.ema_200),
            cross(snapshot.macd, snapshot.macd_signal),
            // Volume
            snapshot.volume_ratio.unwrap_or(0.0),
            volume_change(&volumes),
            volume_trend(&volumes, 5),
            // Volatility
            snapshot.bb_width.unwrap_or(0.0),
            snapshot.atr.unwrap_or(0.0),
            // Momentum
            snapshot.rsi_14.unwrap_or(NEUTRAL_OSCILLATOR),
            snapshot.rsi_7.unwrap_or(NEUTRAL_OSCILLATOR),
            snapshot.macd_histogram.unwrap_or(0.0),
            snapshot.stoch_k.unwrap_or(NEUTRAL_OSCILLATOR),
            snapshot.stoch_d.unwrap_or(NEUTRAL_OSCILLATOR),
            snapshot.adx.unwrap_or(0.0),
            snapshot.cci.unwrap_or(0.0),
            // Market context
            context
                .and_then(|c| c.btc_dominance)
                .unwrap_or(NEUTRAL_OSCILLATOR),
            context
                .and_then(|c| c.fear_greed_index)
                .unwrap_or(NEUTRAL_OSCILLATOR),
            context.map_or(0.0, |c| c.market_regime.encoded()),
        ];

        FeatureVector::from_array(values)
    }
}

/// +1 if `a > b`, -1 otherwise (ties included), 0 when either side is missing.
pub(crate) fn cross(a: Option<f64>, b: Option<f64>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a > b => 1.0,
        (Some(_), Some(_)) => -1.0,
        _ => 0.0,
    }
}

/// Percent change of the last value against the one `lag` bars earlier.
fn pct_change_back(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return 0.0;
    }
    let current = values[values.len() - 1];
    let previous = values[values.len() - 1 - lag];
    (current - previous) / previous * 100.0
}

fn ratio_or_one(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        1.0
    }
}

fn volume_change(volumes: &[f64]) -> f64 {
    match volumes {
        [.., previous, current] if *previous > 0.0 => (current - previous) / previous * 100.0,
        _ => 0.0,
    }
}

/// Least-squares slope of the last `n` values against index 0..n.
fn volume_trend(volumes: &[f64], n: usize) -> f64 {
    if n < 2 || volumes.len() < n {
        return 0.0;
    }
    let recent = &volumes[volumes.len() - n..];
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = recent.iter().sum::<f64>() / n as f64;

    let (mut covariance, mut variance) = (0.0, 0.0);
    for (i, y) in recent.iter().enumerate() {
        let dx = i as f64 - x_mean;
        covariance += dx * (y - y_mean);
        variance += dx * dx;
    }
    covariance / variance
}
