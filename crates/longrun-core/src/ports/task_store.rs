//! TaskStore port - タスク状態の正本（source of truth）
//!
//! 永続化媒体そのものは抽象化しています。開発・テスト用には
//! `impls::InMemoryTaskStore` を使います。

use async_trait::async_trait;

use crate::domain::{StoreError, TaskId, TaskRecord, TaskStatus};

/// TaskStore は task_id -> TaskRecord の対応を管理
///
/// # 設計原則
/// - 書き込み（insert / update / delete）はストア全体で相互排他
/// - 読み取りは最新のコミット済み書き込みを観測する
/// - 更新系は状態遷移表に従い、許されない遷移（終端状態からの遷移など）は
///   エラーではなく `Ok(false)` として黙って抑止する
/// - result の有無が status と矛盾する書き込みは `StoreError::InvalidResult`
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a new record. Fails with `AlreadyExists` if the id is taken.
    async fn insert(&self, id: &TaskId, status: TaskStatus) -> Result<TaskRecord, StoreError>;

    /// Snapshot of one record, or `NotFound`.
    async fn get(&self, id: &TaskId) -> Result<TaskRecord, StoreError>;

    /// Snapshot of all records, ordered by creation time then id.
    async fn list(&self) -> Result<Vec<TaskRecord>, StoreError>;

    /// Update unless the current status equals `unless`.
    ///
    /// Returns whether the row changed. A missing id is `Ok(false)`.
    async fn compare_and_update(
        &self,
        id: &TaskId,
        unless: TaskStatus,
        status: TaskStatus,
        result: Option<String>,
    ) -> Result<bool, StoreError>;

    /// Update used by the single engine that owns the id.
    ///
    /// Still serialized with cancellation writers and still bound by the
    /// state machine. A missing id is `Ok(false)`.
    async fn update(
        &self,
        id: &TaskId,
        status: TaskStatus,
        result: Option<String>,
    ) -> Result<bool, StoreError>;

    /// Remove a record. Returns whether it existed.
    async fn delete(&self, id: &TaskId) -> Result<bool, StoreError>;
}
