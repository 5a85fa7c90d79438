//! TaskManager - タスク操作のファサード
//!
//! create / get / list / cancel / delete を提供します。競合する書き込みは
//! TaskStore の原子的プリミティブで直列化され、Manager 自身はロックを持ちません。
//! 実行中タスクのハンドルも保持しません（キャンセルはストアの状態で伝える）。

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{StoreError, TaskError, TaskId, TaskRecord, TaskStatus};
use crate::ports::{IdGenerator, TaskStore};

use super::engine::ExecutionEngine;
use super::status::{ServiceInfo, StatusCounts, TaskResultView};

#[derive(Clone)]
pub struct TaskManager {
    store: Arc<dyn TaskStore>,
    engine: ExecutionEngine,
    ids: Arc<dyn IdGenerator>,
}

impl TaskManager {
    pub fn new(
        store: Arc<dyn TaskStore>,
        engine: ExecutionEngine,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { store, engine, ids }
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    /// Insert a PENDING record and dispatch the engine. Returns without
    /// waiting for the task to run.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn create(&self) -> Result<TaskId, TaskError> {
        let task_id = self.ids.generate_task_id();
        self.store.insert(&task_id, TaskStatus::Pending).await?;
        info!(task_id = %task_id, "task created");

        // fire-and-forget: 結果はストア経由で観測する
        drop(self.engine.spawn(task_id.clone()));
        Ok(task_id)
    }

    pub async fn get(&self, task_id: &TaskId) -> Result<TaskRecord, TaskError> {
        self.store.get(task_id).await.map_err(not_found)
    }

    /// All tasks, optionally restricted to one status (exact match).
    pub async fn list(&self, status: Option<TaskStatus>) -> Result<Vec<TaskRecord>, TaskError> {
        let mut records = self.store.list().await?;
        if let Some(status) = status {
            records.retain(|record| record.status == status);
        }
        Ok(records)
    }

    /// Request cancellation.
    ///
    /// `true` iff the task existed and was moved to CANCELLED. Unknown ids and
    /// tasks that are already cancelled or finished both give `false`.
    pub async fn cancel(&self, task_id: &TaskId) -> Result<bool, TaskError> {
        let changed = self
            .store
            .compare_and_update(task_id, TaskStatus::Cancelled, TaskStatus::Cancelled, None)
            .await?;
        if changed {
            info!(task_id = %task_id, "task cancelled");
        } else {
            debug!(task_id = %task_id, "cancel had no effect");
        }
        Ok(changed)
    }

    /// Remove the record in any state. A running engine is not stopped; its
    /// later writes are dropped.
    pub async fn delete(&self, task_id: &TaskId) -> Result<bool, TaskError> {
        let existed = self.store.delete(task_id).await?;
        if existed {
            info!(task_id = %task_id, "task deleted");
        }
        Ok(existed)
    }

    pub async fn result(&self, task_id: &TaskId) -> Result<TaskResultView, TaskError> {
        let record = self.get(task_id).await?;
        Ok(TaskResultView::from(&record))
    }

    pub async fn counts(&self) -> Result<StatusCounts, TaskError> {
        let records = self.store.list().await?;
        Ok(StatusCounts::from_records(&records))
    }

    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo::default()
    }
}

fn not_found(err: StoreError) -> TaskError {
    match err {
        StoreError::NotFound(id) => TaskError::NotFound(id),
        other => TaskError::Store(other),
    }
}
