//! Cron-based scheduler for enqueuing per-user evaluation jobs

use crate::db::store::StrategyStore;
use crate::jobs::types::EvaluateUserJob;
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Scheduler that periodically enqueues one [`EvaluateUserJob`] per owner
/// with at least one active strategy. Owners are re-read from the store on
/// every tick, so new users join the rotation without a restart.
pub struct CycleScheduler {
    storage: Arc<RedisStorage<EvaluateUserJob>>,
    store: Arc<dyn StrategyStore>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl CycleScheduler {
    /// `interval_seconds` of 0 means the scheduler is disabled.
    pub fn new(
        storage: Arc<RedisStorage<EvaluateUserJob>>,
        store: Arc<dyn StrategyStore>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if interval_seconds == 0 {
            return Err("Scheduler disabled: interval_seconds is 0".into());
        }

        // Cron format: second minute hour day month weekday
        let cron_expr = if interval_seconds >= 60 {
            let minutes = interval_seconds / 60;
            format!("0 */{} * * * *", minutes)
        } else {
            format!("*/{} * * * * *", interval_seconds)
        };

        let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            "CycleScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            storage,
            store,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let storage = self.storage.clone();
        let store = self.store.clone();
        let schedule = self.schedule.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("CycleScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                let owners = match store.owners_with_active_strategies().await {
                    Ok(owners) => owners,
                    Err(e) => {
                        error!(error = %e, "CycleScheduler: failed to load active owners, skipping tick");
                        continue;
                    }
                };

                if owners.is_empty() {
                    debug!("CycleScheduler: no owners with active strategies this tick");
                    continue;
                }

                info!(
                    owner_count = owners.len(),
                    "CycleScheduler: cron tick, enqueuing EvaluateUserJob for {} owners",
                    owners.len()
                );

                for owner in &owners {
                    let job = EvaluateUserJob {
                        user_id: owner.clone(),
                    };

                    let mut storage_clone = (*storage).clone();
                    match storage_clone.push(job).await {
                        Ok(_) => {
                            debug!(user = %owner, "CycleScheduler: enqueued EvaluateUserJob for {}", owner);
                        }
                        Err(e) => {
                            error!(
                                user = %owner,
                                error = %e,
                                "CycleScheduler: failed to enqueue EvaluateUserJob for {}",
                                owner
                            );
                        }
                    }
                }
            }
        });

        {
            let mut h = handle_arc.write().await;
            *h = Some(handle);
        }

        info!("CycleScheduler: started successfully");
        Ok(())
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("CycleScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
