//! Background eviction scheduler.
//!
//! Reconciles both tiers on a fixed interval:
//! - Durable: deletes rows older than the retention window, in bounded
//!   batches until a short batch.
//! - Volatile: scans the cache namespace and deletes keys left without an
//!   expiration.

use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::TryStreamExt;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, warn};

use crate::domain::models::CacheConfig;
use crate::domain::ports::{DurableStore, KeyTtl, VolatileTransport};
use crate::domain::CacheResult;
use crate::services::orchestrator::CacheOrchestrator;

/// Outcome of a single sweep across both tiers.
///
/// A failed tier is reported, never propagated: one tier's outage must not
/// stop the other tier's cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Rows reclaimed from the durable tier.
    pub durable_deleted: u64,
    /// Volatile keys visited by the scan.
    pub volatile_scanned: u64,
    /// Volatile keys deleted (no expiration, or already gone).
    pub volatile_deleted: u64,
    pub durable_error: Option<String>,
    pub volatile_error: Option<String>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.durable_error.is_none() && self.volatile_error.is_none()
    }
}

/// Cumulative scheduler counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    /// Sweeps executed, scheduled and manual.
    pub sweeps: u64,
    /// Sweeps in which at least one tier reported an error.
    pub failed_sweeps: u64,
    pub total_durable_deleted: u64,
    pub total_volatile_deleted: u64,
    pub last_report: Option<SweepReport>,
}

/// Interval-driven sweeper over a [`CacheOrchestrator`]'s tiers.
pub struct EvictionScheduler<D, T>
where
    D: DurableStore + 'static,
    T: VolatileTransport + 'static,
{
    worker: Arc<SweepWorker<D, T>>,
    period: Duration,
    run_on_start: bool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<D, T> EvictionScheduler<D, T>
where
    D: DurableStore + 'static,
    T: VolatileTransport + 'static,
{
    pub fn new(orchestrator: Arc<CacheOrchestrator<D, T>>, config: &CacheConfig) -> Self {
        Self {
            worker: Arc::new(SweepWorker {
                orchestrator,
                retention_secs: config.durable.retention_secs,
                batch_size: config.durable.sweep_batch_size,
                status: RwLock::new(SchedulerStatus::default()),
            }),
            period: Duration::from_secs(config.sweep.interval_secs),
            run_on_start: config.sweep.run_on_start,
            task: Mutex::new(None),
        }
    }

    /// Arm the interval task. Calling while running is a no-op.
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        self.worker.status.write().await.running = true;
        let worker = Arc::clone(&self.worker);
        let period = self.period;
        let run_on_start = self.run_on_start;

        *task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            if !run_on_start {
                // The first tick completes immediately; swallow it so the
                // initial sweep waits a full period.
                ticker.tick().await;
            }
            loop {
                ticker.tick().await;
                let report = worker.sweep_and_record().await;
                info!(
                    durable_deleted = report.durable_deleted,
                    volatile_deleted = report.volatile_deleted,
                    clean = report.is_clean(),
                    "eviction sweep finished"
                );
            }
        }));
    }

    /// Abort the interval task. Calling while stopped is a no-op.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            handle.abort();
        }
        self.worker.status.write().await.running = false;
    }

    /// Run one sweep immediately, outside the schedule.
    pub async fn run_once(&self) -> SweepReport {
        self.worker.sweep_and_record().await
    }

    pub async fn status(&self) -> SchedulerStatus {
        self.worker.status.read().await.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.worker.status.read().await.running
    }
}

struct SweepWorker<D, T>
where
    D: DurableStore,
    T: VolatileTransport,
{
    orchestrator: Arc<CacheOrchestrator<D, T>>,
    retention_secs: u64,
    batch_size: u32,
    status: RwLock<SchedulerStatus>,
}

impl<D, T> SweepWorker<D, T>
where
    D: DurableStore,
    T: VolatileTransport,
{
    async fn sweep_and_record(&self) -> SweepReport {
        let (durable, volatile) = tokio::join!(self.sweep_durable(), self.sweep_volatile());

        let mut report = SweepReport::default();
        match durable {
            Ok(deleted) => report.durable_deleted = deleted,
            Err(err) => {
                warn!(error = %err, "durable sweep failed");
                report.durable_error = Some(err.to_string());
            }
        }
        match volatile {
            Ok((scanned, deleted)) => {
                report.volatile_scanned = scanned;
                report.volatile_deleted = deleted;
            }
            Err(err) => {
                warn!(error = %err, "volatile sweep failed");
                report.volatile_error = Some(err.to_string());
            }
        }

        let mut status = self.status.write().await;
        status.sweeps += 1;
        if !report.is_clean() {
            status.failed_sweeps += 1;
        }
        status.total_durable_deleted += report.durable_deleted;
        status.total_volatile_deleted += report.volatile_deleted;
        status.last_report = Some(report.clone());

        report
    }

    /// Delete rows past the retention window, one bounded batch at a
    /// time, until a batch comes back short.
    async fn sweep_durable(&self) -> CacheResult<u64> {
        let retention = i64::try_from(self.retention_secs).unwrap_or(i64::MAX);
        let cutoff = Utc::now() - chrono::Duration::seconds(retention);
        let durable = self.orchestrator.durable();

        let mut total = 0u64;
        loop {
            let deleted = durable.delete_older_than(cutoff, self.batch_size).await?;
            total += deleted;
            if deleted < u64::from(self.batch_size) {
                break;
            }
        }
        Ok(total)
    }

    /// Scan the cache namespace and delete keys with no expiration.
    /// Keys that vanish between scan and inspection count as deleted.
    async fn sweep_volatile(&self) -> CacheResult<(u64, u64)> {
        let volatile = self.orchestrator.volatile();
        let mut keys = pin!(volatile.scan_keys());

        let mut scanned = 0u64;
        let mut deleted = 0u64;
        while let Some(key) = keys.try_next().await? {
            scanned += 1;
            match volatile.remaining_ttl(&key).await? {
                KeyTtl::NoExpiry | KeyTtl::Missing => {
                    volatile.delete(&key).await?;
                    deleted += 1;
                }
                KeyTtl::Remaining(_) => {}
            }
        }
        Ok((scanned, deleted))
    }
}
