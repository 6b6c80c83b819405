//! Indicator engine: candle window in, indicator snapshot out.

use super::indicators::{
    Adx, AdxMode, Atr, BollingerBands, Cci, Ema, Macd, Obv, Rsi, Sma, Stochastic, VolumeProfile,
    WilliamsR,
};
use super::{Indicator, IndicatorReading};
use crate::types::{CandleWindow, IndicatorSnapshot};
use tracing::{debug, warn};

/// Computes every indicator over the full trailing window.
///
/// Each indicator resolves on its own: a short window or undefined value
/// leaves that field `None`, a non-finite result is logged at `warn` and also
/// stored as `None`. A snapshot is always produced.
pub struct IndicatorEngine {
    rsi_14: Rsi,
    rsi_7: Rsi,
    macd: Macd,
    emas: [Ema; 5],
    smas: [Sma; 3],
    bollinger: BollingerBands,
    atr: Atr,
    volume: VolumeProfile,
    stochastic: Stochastic,
    adx: Adx,
    cci: Cci,
    willr: WilliamsR,
    obv: Obv,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(AdxMode::default())
    }
}

impl IndicatorEngine {
    pub fn new(adx_mode: AdxMode) -> Self {
        Self {
            rsi_14: Rsi::new(14),
            rsi_7: Rsi::new(7),
            macd: Macd::default(),
            emas: [9, 20, 50, 100, 200].map(Ema::new),
            smas: [20, 50, 200].map(Sma::new),
            bollinger: BollingerBands::default(),
            atr: Atr::default(),
            volume: VolumeProfile::default(),
            stochastic: Stochastic::default(),
            adx: Adx::new(adx_mode),
            cci: Cci::default(),
            willr: WilliamsR::default(),
            obv: Obv,
        }
    }

    /// Compute the snapshot for the last candle of `window`.
    pub fn compute(&self, window: &CandleWindow) -> IndicatorSnapshot {
        let candles = window.candles();
        let symbol = window.symbol();

        debug!(
            "Computing indicators for {} {} with {} candles",
            symbol,
            window.timeframe(),
            candles.len()
        );

        let slot = |name: &str, reading: IndicatorReading| resolve(symbol, name, reading);

        let macd = self.macd.calculate(candles);
        let [ema_9, ema_20, ema_50, ema_100, ema_200] = self
            .emas
            .each_ref()
            .map(|ema| slot(ema.id(), ema.calculate(candles)));
        let [sma_20, sma_50, sma_200] = self
            .smas
            .each_ref()
            .map(|sma| slot(sma.id(), sma.calculate(candles)));
        let bands = self.bollinger.calculate(candles);
        let volume = self.volume.calculate(candles);
        let stochastic = self.stochastic.calculate(candles);

        let snapshot = IndicatorSnapshot {
            rsi_14: slot(self.rsi_14.id(), self.rsi_14.calculate(candles)),
            rsi_7: slot(self.rsi_7.id(), self.rsi_7.calculate(candles)),
            macd: slot("macd", macd.macd),
            macd_signal: slot("macd_signal", macd.signal),
            macd_histogram: slot("macd_histogram", macd.histogram),
            ema_9,
            ema_20,
            ema_50,
            ema_100,
            ema_200,
            sma_20,
            sma_50,
            sma_200,
            bb_upper: slot("bb_upper", bands.upper),
            bb_middle: slot("bb_middle", bands.middle),
            bb_lower: slot("bb_lower", bands.lower),
            bb_width: slot("bb_width", bands.width),
            atr: slot(self.atr.id(), self.atr.calculate(candles)),
            volume_avg_20: slot("volume_avg_20", volume.average),
            volume_ratio: slot("volume_ratio", volume.ratio),
            stoch_k: slot("stoch_k", stochastic.k),
            stoch_d: slot("stoch_d", stochastic.d),
            adx: slot(self.adx.id(), self.adx.calculate(candles)),
            cci: slot(self.cci.id(), self.cci.calculate(candles)),
            willr: slot(self.willr.id(), self.willr.calculate(candles)),
            obv: slot(self.obv.id(), self.obv.calculate(candles)),
        };

        debug!(
            "Resolved {}/26 indicators for {}",
            snapshot.available(),
            symbol
        );

        snapshot
    }
}

/// Collapse a reading into the snapshot's nullable slot.
fn resolve(symbol: &str, name: &str, reading: IndicatorReading) -> Option<f64> {
    match reading {
        Ok(value) => Some(value),
        Err(err) if err.is_failure() => {
            warn!("{} ({})", err.into_signal_error(name), symbol);
            None
        }
        Err(err) => {
            debug!("{} unavailable for {}: {}", name, symbol, err);
            None
        }
    }
}
