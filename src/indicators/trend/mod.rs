pub mod ema;
pub mod sma;

pub use ema::ema;
pub use sma::sma;
