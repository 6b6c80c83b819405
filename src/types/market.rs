use serde::{Deserialize, Serialize};

/// Broad market regime, as classified by the market-context collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    Bull,
    Bear,
    Sideways,
    Volatile,
    #[default]
    Unknown,
}

impl MarketRegime {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bull" => Some(Self::Bull),
            "bear" => Some(Self::Bear),
            "sideways" => Some(Self::Sideways),
            "volatile" => Some(Self::Volatile),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Classify from BTC's 30-day change (%) and a volatility reading.
    ///
    /// Volatility above 5 wins over direction; otherwise a move beyond
    /// +/-10% is a bull or bear regime.
    pub fn classify(btc_change_30d_pct: f64, volatility: f64) -> Self {
        if !btc_change_30d_pct.is_finite() || !volatility.is_finite() {
            return Self::Unknown;
        }
        if volatility > 5.0 {
            Self::Volatile
        } else if btc_change_30d_pct > 10.0 {
            Self::Bull
        } else if btc_change_30d_pct < -10.0 {
            Self::Bear
        } else {
            Self::Sideways
        }
    }

    /// Numeric encoding used as a model feature.
    pub fn encoded(&self) -> f64 {
        match self {
            Self::Bull => 1.0,
            Self::Bear => -1.0,
            _ => 0.0,
        }
    }
}

/// Market-wide context supplied by the caller alongside a candle window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    /// BTC share of total market cap (%).
    #[serde(default)]
    pub btc_dominance: Option<f64>,
    /// Fear & Greed index (0-100).
    #[serde(default)]
    pub fear_greed_index: Option<f64>,
    #[serde(default)]
    pub market_regime: MarketRegime,
}
