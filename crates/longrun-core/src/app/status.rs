//! Status - 呼び出し側（HTTP 層など）向けのビュー
//!
//! - `TaskStatusView`: `GET /tasks/{id}/status` 相当
//! - `TaskResultView`: `GET /tasks/{id}/result` 相当（CANCELLED のメッセージはここで合成）
//! - `StatusCounts`: 状態ごとの件数
//! - `ServiceInfo`: ヘルスチェックの応答

use serde::{Deserialize, Serialize};

use crate::domain::{TaskId, TaskRecord, TaskStatus};

/// Synthesized at read time; never stored.
pub const CANCELLED_MESSAGE: &str = "Task was cancelled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusView {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

impl From<&TaskRecord> for TaskStatusView {
    fn from(record: &TaskRecord) -> Self {
        Self {
            task_id: record.id.clone(),
            status: record.status,
        }
    }
}

/// `result` on SUCCESS, `error` on FAILURE or CANCELLED, neither otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResultView {
    pub task_id: TaskId,
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&TaskRecord> for TaskResultView {
    fn from(record: &TaskRecord) -> Self {
        let (result, error) = match record.status {
            TaskStatus::Success => (record.result.clone(), None),
            TaskStatus::Failure => (None, record.result.clone()),
            TaskStatus::Cancelled => (None, Some(CANCELLED_MESSAGE.to_string())),
            TaskStatus::Pending | TaskStatus::Running => (None, None),
        };
        Self {
            task_id: record.id.clone(),
            status: record.status,
            result,
            error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub running: usize,
    pub success: usize,
    pub failure: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TaskRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Running => counts.running += 1,
                TaskStatus::Success => counts.success += 1,
                TaskStatus::Failure => counts.failure += 1,
                TaskStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.pending + self.running + self.success + self.failure + self.cancelled
    }

    pub fn in_flight(&self) -> usize {
        self.pending + self.running
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "Long Running Tasks API".to_string(),
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
