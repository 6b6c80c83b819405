//! ATR-based stop-loss and take-profit levels.

use crate::types::Direction;
use serde::Serialize;
use tracing::debug;

/// Stop distance in ATRs.
pub const ATR_MULTIPLIER: f64 = 1.5;
/// Target distance as a multiple of the stop distance.
pub const RISK_REWARD: f64 = 1.5;

/// Suggested exit prices, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Places stop and target around the entry price.
#[derive(Debug, Clone, Copy)]
pub struct RiskLevelCalculator {
    atr_multiplier: f64,
    risk_reward: f64,
}

impl Default for RiskLevelCalculator {
    fn default() -> Self {
        Self {
            atr_multiplier: ATR_MULTIPLIER,
            risk_reward: RISK_REWARD,
        }
    }
}

impl RiskLevelCalculator {
    /// Levels for a position opened at `entry`.
    ///
    /// - LONG: stop below entry, target `risk_reward` stop-distances above
    /// - SHORT: mirrored
    /// - NEUTRAL: symmetric band of one stop-distance either side
    ///
    /// Returns `None` if entry or ATR is missing, non-positive or non-finite,
    /// if rounding collapses a level onto the entry, or if a level would be a
    /// price at or below zero.
    pub fn levels(
        &self,
        entry: Option<f64>,
        direction: Direction,
        atr: Option<f64>,
    ) -> Option<RiskLevels> {
        let entry = entry.filter(|e| e.is_finite() && *e > 0.0)?;
        let atr = atr.filter(|a| a.is_finite() && *a > 0.0)?;
        let distance = atr * self.atr_multiplier;

        let (stop_loss, take_profit) = match direction {
            Direction::Long => {
                let stop = entry - distance;
                (stop, entry + (entry - stop) * self.risk_reward)
            }
            Direction::Short => {
                let stop = entry + distance;
                (stop, entry - (stop - entry) * self.risk_reward)
            }
            Direction::Neutral => (entry - distance, entry + distance),
        };

        let levels = RiskLevels {
            stop_loss: round2(stop_loss),
            take_profit: round2(take_profit),
        };

        let ordered = match direction {
            Direction::Short => levels.take_profit < entry && entry < levels.stop_loss,
            Direction::Long | Direction::Neutral => {
                levels.stop_loss < entry && entry < levels.take_profit
            }
        };
        let positive = levels.stop_loss > 0.0 && levels.take_profit > 0.0;
        if !ordered || !positive {
            debug!(
                "Risk levels collapsed for entry {} and ATR {}: {:?}",
                entry, atr, levels
            );
            return None;
        }

        Some(levels)
    }
}

/// Round half away from zero to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
