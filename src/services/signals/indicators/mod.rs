//! Technical indicator implementations.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;
pub mod williams;

pub use adx::{Adx, AdxMode};
pub use atr::Atr;
pub use bollinger::{BollingerBands, BollingerReading};
pub use cci::Cci;
pub use ema::Ema;
pub use macd::{Macd, MacdReading};
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticReading};
pub use volume::{VolumeProfile, VolumeReading};
pub use williams::WilliamsR;
