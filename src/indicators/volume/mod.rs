pub mod vwap;

pub use vwap::vwap;
