pub mod macd;
pub mod rsi;

pub use macd::{macd, MacdSeries};
pub use rsi::rsi;
