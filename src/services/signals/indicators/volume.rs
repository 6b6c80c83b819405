//! Volume average and relative volume.

use crate::services::signals::{
    finite, mean_of_last, require, Indicator, IndicatorError, IndicatorReading,
};
use crate::types::Candle;

/// Rolling mean volume and the current bar's volume relative to it.
pub struct VolumeProfile {
    period: usize,
}

/// Current average volume and volume ratio (%).
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeReading {
    pub average: IndicatorReading,
    pub ratio: IndicatorReading,
}

impl Default for VolumeProfile {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Indicator for VolumeProfile {
    type Output = VolumeReading;

    fn id(&self) -> &str {
        "volume"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[Candle]) -> VolumeReading {
        if let Err(err) = require(candles, self.period) {
            return VolumeReading {
                average: Err(err.clone()),
                ratio: Err(err),
            };
        }

        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        let Some(average) = mean_of_last(&volumes, self.period) else {
            let err = IndicatorError::Insufficient {
                needed: self.period,
                available: candles.len(),
            };
            return VolumeReading {
                average: Err(err.clone()),
                ratio: Err(err),
            };
        };

        let current = volumes[volumes.len() - 1];
        let ratio = if average > 0.0 {
            finite(current / average * 100.0)
        } else {
            Err(IndicatorError::Undefined("zero average volume"))
        };

        VolumeReading {
            average: finite(average),
            ratio,
        }
    }
}
