//! Task record: status + result + timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::StoreError;
use super::{TaskId, TaskStatus};

/// Persisted task record.
///
/// Design:
/// - `result` is present iff `status` is SUCCESS or FAILURE.
/// - State transitions happen only through [`TaskRecord::transition`], which
///   refuses edges the state machine does not have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn new(id: TaskId, status: TaskStatus, now: DateTime<Utc>) -> Result<Self, StoreError> {
        check_result(&id, status, None)?;
        Ok(Self {
            id,
            status,
            result: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move to `next` with `result`.
    ///
    /// Returns `Ok(false)` without touching the record when the edge is not
    /// allowed (terminal source, backwards, or self-transition).
    pub fn transition(
        &mut self,
        next: TaskStatus,
        result: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        check_result(&self.id, next, result.as_deref())?;
        if !self.status.can_transition_to(next) {
            return Ok(false);
        }
        self.status = next;
        self.result = result;
        self.updated_at = now;
        Ok(true)
    }
}

fn check_result(id: &TaskId, status: TaskStatus, result: Option<&str>) -> Result<(), StoreError> {
    if status.requires_result() != result.is_some() {
        return Err(StoreError::InvalidResult {
            id: id.clone(),
            status,
        });
    }
    Ok(())
}
