use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{Result, SignalError};

/// Feature names in model input order.
///
/// A model trained against this layout scores by position, so entries must
/// only ever be appended.
pub const FEATURE_CATALOG: [&str; 22] = [
    // Price
    "price_change_1",
    "price_change_5",
    "high_low_ratio",
    "close_open_ratio",
    // Trend
    "ema_20_50_cross",
    "ema_50_200_cross",
    "macd_signal_cross",
    // Volume
    "volume_ratio",
    "volume_change_1",
    "volume_trend_5",
    // Volatility
    "bb_width",
    "atr",
    // Momentum
    "rsi_14",
    "rsi_7",
    "macd_histogram",
    "stoch_k",
    "stoch_d",
    "adx",
    "cci",
    // Market context
    "btc_dominance",
    "fear_greed_index",
    "market_regime_encoded",
];

pub const FEATURE_COUNT: usize = FEATURE_CATALOG.len();

/// A fixed-layout vector of finite feature values, ordered by [`FEATURE_CATALOG`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build from values already in catalog order; non-finite values become 0.0.
    pub(crate) fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            values: values.map(|v| if v.is_finite() { v } else { 0.0 }),
        }
    }

    /// Build from an externally supplied slice, which must match the catalog
    /// length and contain only finite values.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let values: [f64; FEATURE_COUNT] = values.try_into().map_err(|_| {
            SignalError::FeatureBuild(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                values.len()
            ))
        })?;

        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(SignalError::FeatureBuild(format!(
                "feature {} is not finite",
                FEATURE_CATALOG[idx]
            )));
        }

        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Look up a feature by catalog name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_CATALOG
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.values[idx])
    }

    /// Iterate `(name, value)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_CATALOG.iter().copied().zip(self.values.iter().copied())
    }
}

// Serialized as a map so attribution payloads stay readable, keeping catalog order.
impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
