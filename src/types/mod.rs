pub mod candle;
pub mod features;
pub mod indicators;
pub mod market;
pub mod signals;

pub use candle::*;
pub use features::*;
pub use indicators::*;
pub use market::*;
pub use signals::*;
