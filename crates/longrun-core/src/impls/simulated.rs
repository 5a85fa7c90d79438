//! SimulatedWorkload - 固定のプレースホルダジョブ
//!
//! 各 tick では何もせず、完了時に id を含む完了メッセージを返します。
//! 所要時間は engine の tick 数 × tick 間隔で決まります。

use async_trait::async_trait;

use crate::domain::TaskId;
use crate::ports::{ExecutionFault, Workload};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedWorkload;

impl SimulatedWorkload {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Workload for SimulatedWorkload {
    async fn step(&self, _task_id: &TaskId, _tick: u32) -> Result<(), ExecutionFault> {
        Ok(())
    }

    fn output(&self, task_id: &TaskId) -> Result<String, ExecutionFault> {
        Ok(format!("Task {task_id} completed successfully!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn output_references_task_and_completion() {
        let work = SimulatedWorkload::new();
        let id = TaskId::new("01ARZ3NDEKTSV4RRFFQ69G5FAV");

        work.step(&id, 0).await.unwrap();
        let out = work.output(&id).unwrap();

        assert!(out.contains(id.as_str()));
        assert!(out.contains("completed"));
    }
}
