//! ExecutionEngine - 1 タスクの実行を担当
//!
//! # フロー
//! 1. TaskStore::update() で PENDING -> RUNNING
//! 2. tick ループ: 各 tick の前に状態を読み直し、CANCELLED なら書き込みせず終了
//! 3. 全 tick 完了: CANCELLED でなければ SUCCESS を書く（条件付き書き込み）
//! 4. 実行中の障害（Err / panic）: CANCELLED でなければ FAILURE を書く
//!
//! キャンセルは協調的です。キャンセル要求は状態を書き換えるだけで、実行単位を
//! 中断しません。tick 間の sleep が唯一の待機点なので、キャンセルが観測される
//! までの遅延は最大 1 tick です。

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, instrument, warn};

use crate::config::EngineConfig;
use crate::domain::{StoreError, TaskId, TaskStatus};
use crate::ports::{ExecutionFault, TaskStore, Workload};

/// How one engine run ended. Only used for logs and tests; there is no
/// synchronous caller to report it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// SUCCESS was committed by this run.
    Succeeded,

    /// FAILURE was committed by this run.
    Failed,

    /// A cancellation won the race; this run wrote no terminal state.
    Cancelled,

    /// The record was deleted mid-flight; later writes were dropped.
    Vanished,

    /// The store failed; the run was abandoned.
    Aborted,
}

/// Result of the tick loop, before the terminal write.
enum Progress {
    Completed(String),
    Stopped(RunOutcome),
}

#[derive(Clone)]
pub struct ExecutionEngine {
    store: Arc<dyn TaskStore>,
    workload: Arc<dyn Workload>,
    ticks: u32,
    tick_interval: Duration,
}

impl ExecutionEngine {
    pub fn new(
        store: Arc<dyn TaskStore>,
        workload: Arc<dyn Workload>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            store,
            workload,
            ticks: config.ticks,
            tick_interval: config.tick_interval(),
        }
    }

    /// Upper bound between a cancellation and the engine observing it.
    pub fn cancellation_latency(&self) -> Duration {
        self.tick_interval
    }

    /// Run `task_id` on its own tokio task (fire-and-forget for callers).
    pub fn spawn(&self, task_id: TaskId) -> JoinHandle<RunOutcome> {
        let engine = self.clone();
        tokio::spawn(async move { engine.execute(task_id).await })
    }

    /// Drive one task from PENDING to a terminal state.
    #[instrument(name = "execute", skip_all, fields(task_id = %task_id))]
    pub async fn execute(&self, task_id: TaskId) -> RunOutcome {
        match self.store.update(&task_id, TaskStatus::Running, None).await {
            Ok(true) => debug!("running"),
            Ok(false) => return self.settle_preempted(&task_id).await,
            Err(e) => {
                error!(error = %e, "failed to mark task running");
                return RunOutcome::Aborted;
            }
        }

        // attempt 単位で障害を捕捉する（panic も JoinError として回収）
        let attempt = {
            let engine = self.clone();
            let id = task_id.clone();
            tokio::spawn(async move { engine.run_ticks(&id).await })
        };
        let progress = match attempt.await {
            Ok(progress) => progress,
            Err(join_err) => Err(fault_from_join(join_err)),
        };

        match progress {
            Ok(Progress::Completed(output)) => {
                self.finish(&task_id, TaskStatus::Success, output).await
            }
            Ok(Progress::Stopped(outcome)) => outcome,
            Err(fault) => {
                warn!(error = %fault, "execution fault");
                self.finish(&task_id, TaskStatus::Failure, fault.to_string())
                    .await
            }
        }
    }

    async fn run_ticks(&self, task_id: &TaskId) -> Result<Progress, ExecutionFault> {
        for tick in 0..self.ticks {
            match self.store.get(task_id).await {
                Ok(record) if record.status == TaskStatus::Cancelled => {
                    info!(task_id = %task_id, tick, "cancellation observed");
                    return Ok(Progress::Stopped(RunOutcome::Cancelled));
                }
                Ok(_) => {}
                Err(StoreError::NotFound(_)) => {
                    info!(task_id = %task_id, tick, "task deleted while running");
                    return Ok(Progress::Stopped(RunOutcome::Vanished));
                }
                Err(e) => {
                    error!(task_id = %task_id, error = %e, "failed to poll task status");
                    return Ok(Progress::Stopped(RunOutcome::Aborted));
                }
            }

            self.workload.step(task_id, tick).await?;
            debug!(task_id = %task_id, tick, "tick");
            tokio::time::sleep(self.tick_interval).await;
        }

        let output = self.workload.output(task_id)?;
        Ok(Progress::Completed(output))
    }

    /// Terminal write, conditioned on the task not being CANCELLED so a
    /// cancelled task is never resurrected.
    async fn finish(&self, task_id: &TaskId, status: TaskStatus, payload: String) -> RunOutcome {
        match self
            .store
            .compare_and_update(task_id, TaskStatus::Cancelled, status, Some(payload))
            .await
        {
            Ok(true) => {
                info!(%status, "task finished");
                match status {
                    TaskStatus::Success => RunOutcome::Succeeded,
                    _ => RunOutcome::Failed,
                }
            }
            Ok(false) => self.settle_preempted(task_id).await,
            Err(e) => {
                error!(%status, error = %e, "failed to write terminal state");
                RunOutcome::Aborted
            }
        }
    }

    /// Explain a suppressed write: cancelled, deleted, or something unexpected.
    async fn settle_preempted(&self, task_id: &TaskId) -> RunOutcome {
        match self.store.get(task_id).await {
            Ok(record) if record.status == TaskStatus::Cancelled => {
                info!("write suppressed: task was cancelled");
                RunOutcome::Cancelled
            }
            Ok(record) => {
                warn!(status = %record.status, "write suppressed by unexpected state");
                RunOutcome::Aborted
            }
            Err(StoreError::NotFound(_)) => {
                info!("write dropped: task was deleted");
                RunOutcome::Vanished
            }
            Err(e) => {
                error!(error = %e, "failed to re-read task after suppressed write");
                RunOutcome::Aborted
            }
        }
    }
}

fn fault_from_join(err: JoinError) -> ExecutionFault {
    if err.is_panic() {
        ExecutionFault::new(format!("panic: {}", panic_message(err.into_panic())))
    } else {
        ExecutionFault::new("execution aborted")
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
