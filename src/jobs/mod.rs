//! Job queue system for periodic strategy evaluation

pub mod context;
pub mod handlers;
pub mod types;

pub use context::JobContext;
pub use types::EvaluateUserJob;
