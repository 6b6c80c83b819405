//! End-to-end scoring for a candle window.

use super::engine::IndicatorEngine;
use super::gate::{EntryContext, PredictionGate};
use super::model::{FileModelSource, ModelSource};
use super::predictor::SignalPredictor;
use super::risk::RiskLevelCalculator;
use crate::config::Config;
use crate::types::{CandleWindow, IndicatorSnapshot, MarketContext, Signal};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns one of each stage and runs a window through them:
/// indicators, prediction, risk levels, then the confidence gate.
///
/// `Send + Sync`; share it behind an `Arc`.
pub struct SignalPipeline {
    engine: IndicatorEngine,
    predictor: SignalPredictor,
    risk: RiskLevelCalculator,
    gate: PredictionGate,
    min_candles: usize,
    max_history: usize,
}

impl SignalPipeline {
    /// Build from config with an explicit model source.
    pub fn new(config: &Config, source: Arc<dyn ModelSource>) -> Self {
        Self::with_predictor(
            config,
            SignalPredictor::new(source, config.model.version.clone()),
        )
    }

    /// Build from config, loading artifacts from `config.model.path`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(FileModelSource::new(&config.model.path)))
    }

    pub fn with_predictor(config: &Config, predictor: SignalPredictor) -> Self {
        Self {
            engine: IndicatorEngine::new(config.adx_mode),
            predictor,
            risk: RiskLevelCalculator::default(),
            gate: PredictionGate::new(config.gate()),
            min_candles: config.min_candles.max(1),
            max_history: config.max_history.max(1),
        }
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    pub fn predictor(&self) -> &SignalPredictor {
        &self.predictor
    }

    pub fn gate(&self) -> &PredictionGate {
        &self.gate
    }

    /// Indicators over the capped trailing history.
    pub fn indicators(&self, window: &CandleWindow) -> IndicatorSnapshot {
        self.engine.compute(&self.capped(window))
    }

    /// Score the window's last candle, returning a signal if it qualifies.
    pub fn evaluate(
        &self,
        window: &CandleWindow,
        context: Option<&MarketContext>,
    ) -> Option<Signal> {
        if window.len() < self.min_candles {
            info!(
                "Insufficient candles for {} {}: {} < {}",
                window.symbol(),
                window.timeframe(),
                window.len(),
                self.min_candles
            );
            return None;
        }

        let window = self.capped(window);
        let snapshot = self.engine.compute(&window);
        let prediction = self.predictor.predict(&window, &snapshot, context);

        let entry = EntryContext::from_candle(window.last());
        let levels = self
            .risk
            .levels(Some(entry.entry_price), prediction.direction, snapshot.atr);
        debug!(
            "{} {} scored {} {:.2}%, levels {:?}",
            entry.symbol, entry.timeframe, prediction.direction, prediction.confidence, levels
        );

        self.gate.evaluate(prediction, &entry, levels)
    }

    /// [`SignalPipeline::evaluate`] on the blocking pool, so a first-use model
    /// load never stalls async workers.
    pub async fn evaluate_async(
        self: &Arc<Self>,
        window: CandleWindow,
        context: Option<MarketContext>,
    ) -> Option<Signal> {
        let pipeline = Arc::clone(self);
        match tokio::task::spawn_blocking(move || pipeline.evaluate(&window, context.as_ref()))
            .await
        {
            Ok(signal) => signal,
            Err(e) => {
                warn!("Signal evaluation task failed: {}", e);
                None
            }
        }
    }

    fn capped<'a>(&self, window: &'a CandleWindow) -> Cow<'a, CandleWindow> {
        if window.len() > self.max_history {
            Cow::Owned(window.tail(self.max_history))
        } else {
            Cow::Borrowed(window)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::services::signals::model::{LinearClassifier, ModelBundle, NoModelSource};
    use crate::services::signals::testing::*;
    use crate::services::signals::AdxMode;
    use crate::types::{Direction, Priority, FEATURE_COUNT};

    fn config() -> Config {
        Config {
            model: ModelConfig::default(),
            min_confidence: 70.0,
            min_candles: 50,
            max_history: 500,
            horizon_hours: 24,
            position_size_pct: 5.0,
            adx_mode: AdxMode::Disabled,
        }
    }

    fn pipeline() -> SignalPipeline {
        SignalPipeline::new(&config(), Arc::new(NoModelSource))
    }

    #[test]
    fn test_short_window_no_signal() {
        let window = CandleWindow::new(create_downtrend_candles(49)).unwrap();
        assert!(pipeline().evaluate(&window, None).is_none());
    }

    #[test]
    fn test_history_cap() {
        let mut cfg = config();
        cfg.max_history = 60;
        let pipeline = SignalPipeline::new(&cfg, Arc::new(NoModelSource));

        let window = CandleWindow::new(create_uptrend_candles(250)).unwrap();
        let snapshot = pipeline.indicators(&window);
        // 60 candles: too short for the 100/200 averages
        assert!(snapshot.ema_50.is_some());
        assert!(snapshot.ema_100.is_none());
        assert!(snapshot.sma_200.is_none());
    }

    #[test]
    fn test_model_signal_with_levels() {
        let classifier = LinearClassifier {
            classes: vec![-1, 0, 1],
            coefficients: vec![vec![0.0; FEATURE_COUNT]; 3],
            intercepts: vec![0.0, 0.0, 5.0],
        };
        let predictor = SignalPredictor::with_bundle(ModelBundle {
            version: "1.0".to_string(),
            classifier: Arc::new(classifier),
            scaler: None,
        });
        let pipeline = SignalPipeline::with_predictor(&config(), predictor);

        let window = CandleWindow::new(create_uptrend_candles(120)).unwrap();
        let signal = pipeline.evaluate(&window, None).unwrap();

        assert_eq!(signal.direction, Direction::Long);
        assert_eq!(signal.priority, Priority::Critical);
        assert_eq!(signal.model_type, "linear");
        assert_eq!(signal.entry_price, window.last().close);
        // ATR is 3.0 on this series
        assert_approx(signal.stop_loss.unwrap(), signal.entry_price - 4.5, 1e-9);
        assert_approx(signal.take_profit.unwrap(), signal.entry_price + 6.75, 1e-9);
        assert_eq!(signal.prediction_time, window.last().open_time);
    }
}
