pub mod bollinger;

pub use bollinger::{bollinger, BollingerBand};
