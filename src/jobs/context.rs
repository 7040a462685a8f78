//! Job context for dependency injection.

use crate::engine::ExecutionEngine;
use std::sync::Arc;

/// Context passed to job handlers via the Apalis `Data<T>` pattern.
///
/// Handlers only ever drive the engine; they hold no connections of
/// their own. Metrics live on the engine and the swap gateway.
pub struct JobContext {
    pub engine: Arc<ExecutionEngine>,
}

impl JobContext {
    pub fn new(engine: Arc<ExecutionEngine>) -> Self {
        Self { engine }
    }
}
