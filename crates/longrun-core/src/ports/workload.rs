//! Workload port - タスク本体（1 tick 分の処理）の抽象化
//!
//! ペイロード定義はスコープ外なので、既定実装は固定のプレースホルダ
//! （`impls::SimulatedWorkload`）です。テストでは失敗・panic する実装を
//! 差し込んで FAILURE 経路を検証します。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::TaskId;

/// A fault raised by the work unit. Recorded as FAILURE, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ExecutionFault(pub String);

impl ExecutionFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The body of a task, called by the engine between cancellation checks.
#[async_trait]
pub trait Workload: Send + Sync {
    /// One unit of work. `tick` counts from 0.
    async fn step(&self, task_id: &TaskId, tick: u32) -> Result<(), ExecutionFault>;

    /// Success payload, produced after the last tick.
    fn output(&self, task_id: &TaskId) -> Result<String, ExecutionFault>;
}
