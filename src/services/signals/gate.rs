//! Confidence gate: turns a scored prediction into a signal, or drops it.

use super::risk::RiskLevels;
use crate::types::{Candle, Direction, Prediction, Priority, Signal};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

const MS_PER_HOUR: i64 = 3_600_000;

/// Gate thresholds and signal defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    /// Minimum confidence (0-100) for a prediction to become a signal.
    pub min_confidence: f64,
    /// Signal lifetime from the candle's open time.
    pub horizon_hours: u32,
    /// Recommended position size (% of equity).
    pub position_size_pct: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_confidence: 70.0,
            horizon_hours: 24,
            position_size_pct: 5.0,
        }
    }
}

/// Where and when the candidate signal would be entered.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryContext {
    pub symbol: String,
    pub timeframe: String,
    pub open_time: i64,
    pub entry_price: f64,
}

impl EntryContext {
    /// Enter at the close of `candle`.
    pub fn from_candle(candle: &Candle) -> Self {
        Self {
            symbol: candle.symbol.clone(),
            timeframe: candle.timeframe.clone(),
            open_time: candle.open_time,
            entry_price: candle.close,
        }
    }
}

/// Applies the confidence threshold and builds the signal record.
#[derive(Debug, Clone, Default)]
pub struct PredictionGate {
    config: GateConfig,
}

impl PredictionGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Build a signal if the prediction clears the confidence threshold.
    pub fn evaluate(
        &self,
        prediction: Prediction,
        entry: &EntryContext,
        levels: Option<RiskLevels>,
    ) -> Option<Signal> {
        // NaN never passes.
        if !(prediction.confidence >= self.config.min_confidence) {
            info!(
                "No signal for {} {}: {} confidence {:.2} below {:.2}",
                entry.symbol,
                entry.timeframe,
                prediction.direction,
                prediction.confidence,
                self.config.min_confidence
            );
            return None;
        }

        let expires_at = i64::from(self.config.horizon_hours)
            .checked_mul(MS_PER_HOUR)
            .and_then(|horizon| entry.open_time.checked_add(horizon));
        let Some(expires_at) = expires_at else {
            warn!(
                "No signal for {} {}: expiry of {}h from {} is out of range",
                entry.symbol, entry.timeframe, self.config.horizon_hours, entry.open_time
            );
            return None;
        };

        let (stop_loss_pct, take_profit_pct, risk_reward) =
            percentages(prediction.direction, entry.entry_price, levels);

        let signal = Signal {
            id: Uuid::new_v4(),
            symbol: entry.symbol.clone(),
            timeframe: entry.timeframe.clone(),
            direction: prediction.direction,
            confidence: prediction.confidence,
            entry_price: entry.entry_price,
            stop_loss: levels.map(|l| l.stop_loss),
            take_profit: levels.map(|l| l.take_profit),
            stop_loss_pct,
            take_profit_pct,
            risk_reward,
            position_size_pct: self.config.position_size_pct,
            priority: Priority::from_confidence(prediction.confidence),
            prediction_time: entry.open_time,
            expires_at,
            time_horizon_hours: self.config.horizon_hours,
            model_version: prediction.model_version,
            model_type: prediction.model_type,
            attribution: prediction.attribution,
            created_at: Utc::now().timestamp_millis(),
        };

        info!(
            "Signal {} {} {} at {} ({:.2}%, {:?})",
            signal.symbol,
            signal.timeframe,
            signal.direction,
            signal.entry_price,
            signal.confidence,
            signal.priority
        );

        Some(signal)
    }
}

/// Stop and target distances as % of entry, plus their ratio.
///
/// Undefined for NEUTRAL or without levels; the ratio also needs a positive
/// stop distance.
pub fn percentages(
    direction: Direction,
    entry: f64,
    levels: Option<RiskLevels>,
) -> (Option<f64>, Option<f64>, Option<f64>) {
    let Some(levels) = levels else {
        return (None, None, None);
    };
    if entry <= 0.0 {
        return (None, None, None);
    }

    let (sl_pct, tp_pct) = match direction {
        Direction::Long => (
            (entry - levels.stop_loss) / entry * 100.0,
            (levels.take_profit - entry) / entry * 100.0,
        ),
        Direction::Short => (
            (levels.stop_loss - entry) / entry * 100.0,
            (entry - levels.take_profit) / entry * 100.0,
        ),
        Direction::Neutral => return (None, None, None),
    };

    let risk_reward = (sl_pct > 0.0).then(|| tp_pct / sl_pct);
    (Some(sl_pct), Some(tp_pct), risk_reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribution;

    fn prediction(direction: Direction, confidence: f64) -> Prediction {
        Prediction {
            direction,
            confidence,
            score: None,
            attribution: Attribution::Rules(vec![]),
            model_version: "rules-based".to_string(),
            model_type: "rules".to_string(),
        }
    }

    fn entry() -> EntryContext {
        EntryContext {
            symbol: "ETHUSDT".to_string(),
            timeframe: "4h".to_string(),
            open_time: 1_700_000_000_000,
            entry_price: 100.0,
        }
    }

    fn levels(stop_loss: f64, take_profit: f64) -> Option<RiskLevels> {
        Some(RiskLevels {
            stop_loss,
            take_profit,
        })
    }

    #[test]
    fn test_discard_below_threshold() {
        let gate = PredictionGate::default();
        assert!(gate
            .evaluate(prediction(Direction::Long, 65.0), &entry(), levels(97.0, 104.5))
            .is_none());
        assert!(gate
            .evaluate(prediction(Direction::Long, f64::NAN), &entry(), None)
            .is_none());
    }

    #[test]
    fn test_long_signal() {
        let gate = PredictionGate::default();
        let signal = gate
            .evaluate(prediction(Direction::Long, 75.0), &entry(), levels(97.0, 104.5))
            .unwrap();

        assert_eq!(signal.symbol, "ETHUSDT");
        assert_eq!(signal.priority, Priority::High);
        assert_eq!(signal.stop_loss, Some(97.0));
        assert_eq!(signal.take_profit, Some(104.5));
        assert_eq!(signal.stop_loss_pct, Some(3.0));
        assert_eq!(signal.take_profit_pct, Some(4.5));
        assert_eq!(signal.risk_reward, Some(1.5));
        assert_eq!(signal.position_size_pct, 5.0);
        assert_eq!(signal.prediction_time, 1_700_000_000_000);
        assert_eq!(signal.expires_at, 1_700_000_000_000 + 24 * 3_600_000);
        assert_eq!(signal.model_version, "rules-based");
    }

    #[test]
    fn test_short_percentages() {
        let (sl, tp, rr) = percentages(Direction::Short, 100.0, levels(103.0, 95.5));
        assert_eq!(sl, Some(3.0));
        assert_eq!(tp, Some(4.5));
        assert_eq!(rr, Some(1.5));
    }

    #[test]
    fn test_neutral_percentages_undefined() {
        assert_eq!(
            percentages(Direction::Neutral, 100.0, levels(97.0, 103.0)),
            (None, None, None)
        );
    }

    #[test]
    fn test_signal_without_levels() {
        let gate = PredictionGate::default();
        let signal = gate
            .evaluate(prediction(Direction::Short, 90.0), &entry(), None)
            .unwrap();
        assert_eq!(signal.priority, Priority::Critical);
        assert_eq!(signal.stop_loss, None);
        assert_eq!(signal.risk_reward, None);
    }

    #[test]
    fn test_custom_threshold_reaches_low_priority() {
        let gate = PredictionGate::new(GateConfig {
            min_confidence: 50.0,
            horizon_hours: 4,
            position_size_pct: 2.5,
        });
        let signal = gate
            .evaluate(prediction(Direction::Long, 55.0), &entry(), None)
            .unwrap();
        assert_eq!(signal.priority, Priority::Low);
        assert_eq!(signal.expires_at, 1_700_000_000_000 + 4 * 3_600_000);
        assert_eq!(signal.position_size_pct, 2.5);
    }

    #[test]
    fn test_expiry_out_of_range() {
        let gate = PredictionGate::new(GateConfig {
            horizon_hours: 24_000,
            ..Default::default()
        });
        let late = EntryContext {
            open_time: i64::MAX - 3_600_000,
            ..entry()
        };
        assert!(gate
            .evaluate(prediction(Direction::Long, 80.0), &late, levels(97.0, 104.5))
            .is_none());

        let widest = PredictionGate::new(GateConfig {
            horizon_hours: u32::MAX,
            ..Default::default()
        });
        let signal = widest
            .evaluate(prediction(Direction::Long, 80.0), &entry(), None)
            .unwrap();
        assert_eq!(
            signal.expires_at,
            1_700_000_000_000 + u32::MAX as i64 * 3_600_000
        );
    }

    #[test]
    fn test_entry_from_candle() {
        let candle = Candle::new("BTCUSDT", "1h", 1_000, 10.0, 12.0, 9.0, 11.0, 5.0, 2_000);
        let entry = EntryContext::from_candle(&candle);
        assert_eq!(entry.entry_price, 11.0);
        assert_eq!(entry.open_time, 1_000);
    }
}
