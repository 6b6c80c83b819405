use serde::{Deserialize, Serialize};

/// Technical indicators computed over a candle window.
///
/// Every field is independently nullable: `None` means the window was too
/// short for that indicator, the value is undefined for the data (a flat
/// range, for instance), or its computation failed and was logged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi_14: Option<f64>,
    pub rsi_7: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub ema_9: Option<f64>,
    pub ema_20: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_100: Option<f64>,
    pub ema_200: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_width: Option<f64>,
    pub atr: Option<f64>,
    pub volume_avg_20: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub adx: Option<f64>,
    pub cci: Option<f64>,
    pub willr: Option<f64>,
    pub obv: Option<f64>,
}

impl IndicatorSnapshot {
    /// All entries as `(name, value)` pairs, in declaration order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 26] {
        [
            ("rsi_14", self.rsi_14),
            ("rsi_7", self.rsi_7),
            ("macd", self.macd),
            ("macd_signal", self.macd_signal),
            ("macd_histogram", self.macd_histogram),
            ("ema_9", self.ema_9),
            ("ema_20", self.ema_20),
            ("ema_50", self.ema_50),
            ("ema_100", self.ema_100),
            ("ema_200", self.ema_200),
            ("sma_20", self.sma_20),
            ("sma_50", self.sma_50),
            ("sma_200", self.sma_200),
            ("bb_upper", self.bb_upper),
            ("bb_middle", self.bb_middle),
            ("bb_lower", self.bb_lower),
            ("bb_width", self.bb_width),
            ("atr", self.atr),
            ("volume_avg_20", self.volume_avg_20),
            ("volume_ratio", self.volume_ratio),
            ("stoch_k", self.stoch_k),
            ("stoch_d", self.stoch_d),
            ("adx", self.adx),
            ("cci", self.cci),
            ("willr", self.willr),
            ("obv", self.obv),
        ]
    }

    /// Number of indicators that resolved to a value.
    pub fn available(&self) -> usize {
        self.entries().iter().filter(|(_, v)| v.is_some()).count()
    }
}
