//! InMemoryTaskStore - 開発・テスト用の正本
//!
//! # 実装詳細
//! - `RwLock<HashMap<TaskId, TaskRecord>>` でストア全体を 1 つのロックで保護
//! - 書き込みは write lock（ストア全体で相互排他）
//! - 読み取りは read lock（並行可、最新のコミット済み状態を観測）
//! - 各 read-modify-write は write lock の中で完結する（ロック跨ぎ await しない）

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{StoreError, TaskId, TaskRecord, TaskStatus};
use crate::ports::{Clock, SystemClock, TaskStore};

pub struct InMemoryTaskStore<C = SystemClock> {
    records: RwLock<HashMap<TaskId, TaskRecord>>,
    clock: C,
}

impl InMemoryTaskStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryTaskStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryTaskStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<C: Clock> TaskStore for InMemoryTaskStore<C> {
    async fn insert(&self, id: &TaskId, status: TaskStatus) -> Result<TaskRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.clone()));
        }
        let record = TaskRecord::new(id.clone(), status, self.clock.now())?;
        records.insert(id.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &TaskId) -> Result<TaskRecord, StoreError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn list(&self) -> Result<Vec<TaskRecord>, StoreError> {
        let mut all: Vec<TaskRecord> = self.records.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn compare_and_update(
        &self,
        id: &TaskId,
        unless: TaskStatus,
        status: TaskStatus,
        result: Option<String>,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(id) else {
            return Ok(false);
        };
        if record.status == unless {
            debug!(task_id = %id, current = %record.status, "conditional write skipped");
            return Ok(false);
        }
        apply(record, status, result, &self.clock)
    }

    async fn update(
        &self,
        id: &TaskId,
        status: TaskStatus,
        result: Option<String>,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(id) else {
            return Ok(false);
        };
        apply(record, status, result, &self.clock)
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}

fn apply<C: Clock>(
    record: &mut TaskRecord,
    status: TaskStatus,
    result: Option<String>,
    clock: &C,
) -> Result<bool, StoreError> {
    let from = record.status;
    let changed = record.transition(status, result, clock.now())?;
    if !changed {
        debug!(task_id = %record.id, %from, to = %status, "transition suppressed");
    }
    Ok(changed)
}
