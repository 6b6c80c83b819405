use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};

/// A single OHLCV candle. Timestamps are Unix milliseconds.
///
/// Candles are keyed by `(symbol, timeframe, open_time)` and never mutated
/// once built; use [`Candle::validate`] (or [`CandleWindow::new`], which calls
/// it) before feeding externally sourced data into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub symbol: String,
    pub timeframe: String,
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trades_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taker_buy_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taker_buy_quote_volume: Option<f64>,
}

impl Candle {
    /// Create a candle with no exchange extras.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        timeframe: impl Into<String>,
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time,
            quote_volume: None,
            trades_count: None,
            taker_buy_volume: None,
            taker_buy_quote_volume: None,
        }
    }

    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Check field ranges and OHLC consistency.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SignalError::InvalidCandle(msg));

        if self.symbol.is_empty() || self.symbol.len() > 20 {
            return invalid(format!("symbol must be 1-20 chars, got {:?}", self.symbol));
        }
        if self.timeframe.is_empty() || self.timeframe.len() > 10 {
            return invalid(format!(
                "timeframe must be 1-10 chars, got {:?}",
                self.timeframe
            ));
        }
        if self.open_time <= 0 {
            return invalid(format!("open_time must be positive, got {}", self.open_time));
        }
        if self.close_time <= self.open_time {
            return invalid(format!(
                "close_time {} must be after open_time {}",
                self.close_time, self.open_time
            ));
        }

        for (name, price) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !price.is_finite() || price <= 0.0 {
                return invalid(format!("{} must be a positive finite price, got {}", name, price));
            }
        }

        if !self.volume.is_finite() || self.volume < 0.0 {
            return invalid(format!("volume must be non-negative, got {}", self.volume));
        }
        for (name, extra) in [
            ("quote_volume", self.quote_volume),
            ("taker_buy_volume", self.taker_buy_volume),
            ("taker_buy_quote_volume", self.taker_buy_quote_volume),
        ] {
            if let Some(v) = extra {
                if !v.is_finite() || v < 0.0 {
                    return invalid(format!("{} must be non-negative, got {}", name, v));
                }
            }
        }

        if self.high < self.low {
            return invalid(format!("high {} below low {}", self.high, self.low));
        }
        if self.high < self.open.max(self.close) {
            return invalid(format!(
                "high {} below body (open {}, close {})",
                self.high, self.open, self.close
            ));
        }
        if self.low > self.open.min(self.close) {
            return invalid(format!(
                "low {} above body (open {}, close {})",
                self.low, self.open, self.close
            ));
        }

        Ok(())
    }
}

/// An ordered, validated run of candles for one symbol and timeframe.
///
/// Guarantees: non-empty, strictly ascending `open_time`, every candle valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleWindow {
    candles: Vec<Candle>,
}

impl CandleWindow {
    /// Validate and wrap a candle sequence.
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        let first = candles
            .first()
            .ok_or_else(|| SignalError::InvalidWindow("window is empty".to_string()))?;

        for candle in &candles {
            candle.validate()?;
            if candle.symbol != first.symbol || candle.timeframe != first.timeframe {
                return Err(SignalError::InvalidWindow(format!(
                    "mixed series: {}/{} and {}/{}",
                    first.symbol, first.timeframe, candle.symbol, candle.timeframe
                )));
            }
        }

        for pair in candles.windows(2) {
            if pair[1].open_time <= pair[0].open_time {
                return Err(SignalError::InvalidWindow(format!(
                    "open_time must be strictly ascending: {} then {}",
                    pair[0].open_time, pair[1].open_time
                )));
            }
        }

        Ok(Self { candles })
    }

    /// Parse a JSON array of candles and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let candles: Vec<Candle> = serde_json::from_str(json)?;
        Self::new(candles)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle.
    pub fn last(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }

    pub fn symbol(&self) -> &str {
        &self.last().symbol
    }

    pub fn timeframe(&self) -> &str {
        &self.last().timeframe
    }

    /// The trailing `n` candles (the whole window if it is shorter).
    pub fn tail(&self, n: usize) -> CandleWindow {
        let n = n.max(1).min(self.candles.len());
        Self {
            candles: self.candles[self.candles.len() - n..].to_vec(),
        }
    }
}
