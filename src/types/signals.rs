use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FeatureVector;

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
    Neutral,
}

impl Direction {
    /// Map a classifier label: +1 long, -1 short, anything else neutral.
    pub fn from_label(label: i64) -> Self {
        match label {
            1 => Direction::Long,
            -1 => Direction::Short,
            _ => Direction::Neutral,
        }
    }

    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
            Direction::Neutral => "NEUTRAL",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse urgency tier derived from confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// >= 85 critical, >= 75 high, >= 70 medium, otherwise low.
    pub fn from_confidence(confidence: f64) -> Self {
        match confidence {
            c if c >= 85.0 => Priority::Critical,
            c if c >= 75.0 => Priority::High,
            c if c >= 70.0 => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

/// What drove a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Attribution {
    /// Model-backed: the exact feature vector that was scored.
    Features(FeatureVector),
    /// Rule-based: the rules that fired.
    Rules(Vec<String>),
}

/// A scored candidate before gating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub direction: Direction,
    /// Confidence in [0, 100].
    pub confidence: f64,
    /// Rule score; only set on the rule-based path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    pub attribution: Attribution,
    pub model_version: String,
    pub model_type: String,
}

/// An emitted trading signal. Built once by the gate and never mutated here;
/// status transitions belong to whoever persists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: Uuid,
    pub symbol: String,
    pub timeframe: String,
    pub direction: Direction,
    pub confidence: f64,
    pub entry_price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
    pub risk_reward: Option<f64>,
    /// Recommended position size (% of equity).
    pub position_size_pct: f64,
    pub priority: Priority,
    /// Open time of the candle the signal was generated on (ms).
    pub prediction_time: i64,
    /// Unix milliseconds after which the signal is stale.
    pub expires_at: i64,
    pub time_horizon_hours: u32,
    pub model_version: String,
    pub model_type: String,
    pub attribution: Attribution,
    /// Unix milliseconds when the signal was built.
    pub created_at: i64,
}
