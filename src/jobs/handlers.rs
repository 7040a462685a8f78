//! Job handlers for the evaluation worker.

use crate::jobs::context::JobContext;
use crate::jobs::types::EvaluateUserJob;
use crate::models::trade::EvaluationStatus;
use apalis::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Handler for one user's evaluation cycle.
///
/// Store failures bubble out so Apalis can retry the job; per-strategy
/// failures are already folded into outcomes by the engine and never
/// fail the job.
pub async fn handle_evaluate_user(
    job: EvaluateUserJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let start = Instant::now();
    debug!(user = %job.user_id, "EvaluateUserJob: starting cycle");

    let outcomes = ctx.engine.evaluate_user(&job.user_id).await.map_err(|e| {
        error!(user = %job.user_id, error = %e, "EvaluateUserJob: cycle failed");
        Box::new(std::io::Error::other(format!("evaluation cycle failed: {}", e)))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let trades = outcomes
        .iter()
        .filter(|o| o.status == EvaluationStatus::TradeExecuted)
        .count();
    let errors = outcomes
        .iter()
        .filter(|o| o.status == EvaluationStatus::Error)
        .count();

    info!(
        user = %job.user_id,
        strategies = outcomes.len(),
        trades = trades,
        errors = errors,
        duration_ms = start.elapsed().as_millis(),
        "EvaluateUserJob: cycle complete for {}",
        job.user_id
    );

    Ok(())
}
