//! Model-backed prediction with a rule-based fallback.

use super::features::FeatureEncoder;
use super::model::{ModelBundle, ModelError, ModelSource, NoModelSource};
use crate::error::SignalError;
use crate::types::{
    Attribution, CandleWindow, Direction, FeatureVector, IndicatorSnapshot, MarketContext,
    Prediction,
};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Version reported by the rule-based path.
pub const RULES_MODEL_VERSION: &str = "rules-based";
/// Model type reported by the rule-based path.
pub const RULES_MODEL_TYPE: &str = "rules";

/// Scores a candle window.
///
/// The classifier is fetched from the [`ModelSource`] on first use and the
/// outcome, including "no model", is kept for the predictor's lifetime.
/// Concurrent first callers block on a single load. Any failure on the model
/// path falls back to the rules, so [`SignalPredictor::predict`] always
/// returns a prediction.
pub struct SignalPredictor {
    source: Arc<dyn ModelSource>,
    version: String,
    model: OnceLock<Option<Arc<ModelBundle>>>,
    encoder: FeatureEncoder,
}

impl SignalPredictor {
    pub fn new(source: Arc<dyn ModelSource>, version: impl Into<String>) -> Self {
        Self {
            source,
            version: version.into(),
            model: OnceLock::new(),
            encoder: FeatureEncoder,
        }
    }

    /// Predictor that always uses the rules.
    pub fn rules_only() -> Self {
        Self::new(Arc::new(NoModelSource), RULES_MODEL_VERSION)
    }

    /// Predictor with an already loaded bundle; the source is never consulted.
    pub fn with_bundle(bundle: ModelBundle) -> Self {
        Self {
            source: Arc::new(NoModelSource),
            version: bundle.version.clone(),
            model: OnceLock::from(Some(Arc::new(bundle))),
            encoder: FeatureEncoder,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The cached bundle, loading it on first call.
    pub fn model(&self) -> Option<&Arc<ModelBundle>> {
        self.model
            .get_or_init(|| match self.source.load(&self.version) {
                Ok(Some(bundle)) => {
                    info!(
                        "Loaded model v{} ({}, scaler: {})",
                        bundle.version,
                        bundle.classifier.kind(),
                        bundle.scaler.is_some()
                    );
                    Some(Arc::new(bundle))
                }
                Ok(None) => {
                    let reason = SignalError::ModelUnavailable(format!(
                        "no artifact for v{}",
                        self.version
                    ));
                    info!("{} - using rule-based predictions", reason);
                    None
                }
                Err(e) => {
                    let reason = SignalError::from(e);
                    warn!(
                        "Failed to load model v{}: {} - using rule-based predictions",
                        self.version, reason
                    );
                    None
                }
            })
            .as_ref()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model().is_some()
    }

    /// Predict from a window and its indicator snapshot.
    pub fn predict(
        &self,
        window: &CandleWindow,
        snapshot: &IndicatorSnapshot,
        context: Option<&MarketContext>,
    ) -> Prediction {
        let Some(bundle) = self.model() else {
            return Self::predict_with_rules(snapshot);
        };

        let features = self.encoder.encode(window, snapshot, context);
        match Self::score_with_model(bundle, &features) {
            Ok(prediction) => {
                debug!(
                    "Model prediction for {}: {} ({:.2}%)",
                    window.symbol(),
                    prediction.direction,
                    prediction.confidence
                );
                prediction
            }
            Err(e) => {
                warn!(
                    "Model prediction failed for {}: {} - falling back to rules",
                    window.symbol(),
                    e
                );
                Self::predict_with_rules(snapshot)
            }
        }
    }

    /// Score a caller-supplied feature vector, in catalog order, with the
    /// cached model. There is no rule fallback here: the rules need an
    /// indicator snapshot, not features.
    pub fn score_features(&self, values: &[f64]) -> crate::error::Result<Prediction> {
        let features = FeatureVector::from_values(values)?;
        let bundle = self.model().ok_or_else(|| {
            SignalError::ModelUnavailable(format!("no model loaded for v{}", self.version))
        })?;
        Ok(Self::score_with_model(bundle, &features)?)
    }

    /// Run the classifier (and scaler, if any) over an encoded vector.
    pub fn score_with_model(
        bundle: &ModelBundle,
        features: &FeatureVector,
    ) -> Result<Prediction, ModelError> {
        let scaled = match &bundle.scaler {
            Some(scaler) => scaler.transform(features.values())?,
            None => features.values().to_vec(),
        };

        let label = bundle.classifier.predict(&scaled)?;
        let probabilities = bundle.classifier.predict_proba(&scaled)?;
        let max_probability = probabilities
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        if !max_probability.is_finite() {
            return Err(ModelError::Invalid(
                "classifier returned no finite probability".to_string(),
            ));
        }

        Ok(Prediction {
            direction: Direction::from_label(label),
            confidence: (max_probability * 100.0).clamp(0.0, 100.0),
            score: None,
            attribution: Attribution::Features(features.clone()),
            model_version: bundle.version.clone(),
            model_type: bundle.classifier.kind().to_string(),
        })
    }

    /// Simple scoring rules over RSI, MACD and the EMA 20/50 pair.
    ///
    /// - RSI(14) < 30: +2, > 70: -2 (a missing RSI reads 50)
    /// - MACD above/below signal: +1/-1
    /// - EMA20 above/below EMA50: +1/-1
    ///
    /// A score of +2 or more is LONG, -2 or less is SHORT.
    pub fn predict_with_rules(snapshot: &IndicatorSnapshot) -> Prediction {
        let mut score: i32 = 0;
        let mut reasons = Vec::new();

        let rsi = snapshot.rsi_14.unwrap_or(50.0);
        if rsi < 30.0 {
            score += 2;
            reasons.push("RSI oversold");
        } else if rsi > 70.0 {
            score -= 2;
            reasons.push("RSI overbought");
        }

        if let (Some(macd), Some(signal)) = (snapshot.macd, snapshot.macd_signal) {
            if macd > signal {
                score += 1;
                reasons.push("MACD bullish");
            } else if macd < signal {
                score -= 1;
                reasons.push("MACD bearish");
            }
        }

        if let (Some(ema_20), Some(ema_50)) = (snapshot.ema_20, snapshot.ema_50) {
            if ema_20 > ema_50 {
                score += 1;
                reasons.push("EMA 20>50");
            } else if ema_20 < ema_50 {
                score -= 1;
                reasons.push("EMA 20<50");
            }
        }

        let (direction, confidence) = match score {
            s if s >= 2 => (Direction::Long, (60 + 5 * s).min(75)),
            s if s <= -2 => (Direction::Short, (60 + 5 * s.abs()).min(75)),
            _ => (Direction::Neutral, 50),
        };

        debug!(
            "Rule-based prediction: {} (score {}, {:?})",
            direction, score, reasons
        );

        Prediction {
            direction,
            confidence: confidence as f64,
            score: Some(score),
            attribution: Attribution::Rules(reasons.into_iter().map(String::from).collect()),
            model_version: RULES_MODEL_VERSION.to_string(),
            model_type: RULES_MODEL_TYPE.to_string(),
        }
    }
}
