//! Errors - エラー型と分類
//!
//! - `StoreError`: 永続化層（TaskStore）のエラー
//! - `TaskError`: リクエスト起点の操作（get/list/cancel/delete）が返すエラー
//!
//! 実行中の障害（ExecutionFault）は `ports::workload` 側で定義し、
//! FAILURE 状態として記録されるだけで呼び出し側には伝播しません。
//! 終端状態への書き込み（AlreadyTerminal）はエラーではなく `false` で表現します。

use thiserror::Error;

use super::{TaskId, TaskStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task already exists: {0}")]
    AlreadyExists(TaskId),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error("result presence does not match status {status} for task {id}")]
    InvalidResult { id: TaskId, status: TaskStatus },

    /// The persistence medium failed; fatal for the operation in progress.
    #[error("task store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    /// Should the calling layer answer "not found" (404)?
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TaskError::NotFound(_) | TaskError::Store(StoreError::NotFound(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_convert_into_task_errors() {
        let err: TaskError = StoreError::Unavailable("disk gone".to_string()).into();
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "task store unavailable: disk gone");
    }

    #[test]
    fn not_found_is_recognized_from_both_layers() {
        assert!(TaskError::NotFound(TaskId::new("a")).is_not_found());
        assert!(TaskError::from(StoreError::NotFound(TaskId::new("a"))).is_not_found());
    }
}
