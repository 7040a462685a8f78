//! Apalis worker setup for evaluation jobs

use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::types::EvaluateUserJob;
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use std::sync::Arc;
use tracing::info;

/// Engine runtime that sets up the Apalis worker for evaluation jobs.
///
/// A single queue is enough: jobs are already one-per-user, and the
/// engine keeps each user's strategies sequential inside the handler.
pub struct EngineRuntime {
    job_context: Arc<JobContext>,
    eval_storage: Arc<RedisStorage<EvaluateUserJob>>,
}

impl EngineRuntime {
    pub fn new(
        job_context: Arc<JobContext>,
        eval_storage: Arc<RedisStorage<EvaluateUserJob>>,
    ) -> Self {
        Self {
            job_context,
            eval_storage,
        }
    }

    /// Start the worker and return its handle for graceful shutdown.
    pub async fn start_workers(
        &self,
    ) -> Result<Vec<tokio::task::JoinHandle<()>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut handles = Vec::new();

        let eval_storage = (*self.eval_storage).clone();
        let job_context = self.job_context.clone();
        let eval_handle = tokio::spawn(async move {
            let worker = WorkerBuilder::new("evaluate-user-worker")
                .data(job_context.clone())
                .backend(eval_storage)
                .build_fn(handlers::handle_evaluate_user);

            info!("EngineRuntime: EvaluateUserJob worker started");
            worker.run().await;
        });
        handles.push(eval_handle);

        info!("EngineRuntime: all workers started");
        Ok(handles)
    }
}
