//! Pure numeric indicator functions over ordered price/candle sequences.
//!
//! Every function is total over input length and returns a same-length
//! sequence with `None` wherever the lookback window has not yet filled.
//! No I/O, no state.

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{macd, rsi, MacdSeries};
pub use trend::{ema, sma};
pub use volatility::{bollinger, BollingerBand};
pub use volume::vwap;
