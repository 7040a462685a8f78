//! Persistent store access.
//!
//! The engine consumes persistence through a narrow read/write interface;
//! `PostgresStore` is the production implementation, `MemoryStore` backs
//! the engine tests.

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::StrategyStore;
