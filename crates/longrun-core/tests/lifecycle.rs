use std::sync::Arc;
use std::time::Duration;

use longrun_core::app::CANCELLED_MESSAGE;
use longrun_core::ports::{ExecutionFault, Workload};
use longrun_core::{EngineConfig, TaskId, TaskManager, TaskManagerBuilder, TaskRecord, TaskStatus};

const TICKS: u32 = 5;
const TICK_MS: u64 = 100;

fn manager() -> TaskManager {
    TaskManagerBuilder::new()
        .engine_config(EngineConfig {
            ticks: TICKS,
            tick_interval_ms: TICK_MS,
        })
        .build()
}

/// Poll until the task leaves PENDING/RUNNING or `timeout` passes.
async fn wait_for_task(manager: &TaskManager, id: &TaskId, timeout: Duration) -> TaskRecord {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let record = manager.get(id).await.unwrap();
        if record.is_terminal() || tokio::time::Instant::now() >= deadline {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(TICK_MS / 2)).await;
    }
}

fn assert_result_invariant(record: &TaskRecord) {
    assert_eq!(
        record.result.is_some(),
        record.status.requires_result(),
        "result presence does not match {}",
        record.status
    );
}

#[tokio::test(start_paused = true)]
async fn created_task_runs_to_success() {
    let manager = manager();
    let id = manager.create().await.unwrap();

    let first = manager.get(&id).await.unwrap();
    assert!(matches!(first.status, TaskStatus::Pending | TaskStatus::Running));

    let record = wait_for_task(&manager, &id, Duration::from_secs(10)).await;

    assert_eq!(record.status, TaskStatus::Success);
    assert_result_invariant(&record);
    let result = record.result.unwrap();
    assert!(result.contains(id.as_str()));
    assert!(result.contains("completed"));
}

#[tokio::test(start_paused = true)]
async fn immediate_cancel_wins_and_engine_stays_quiet() {
    let manager = manager();
    let id = manager.create().await.unwrap();

    assert!(manager.cancel(&id).await.unwrap());

    tokio::time::sleep(Duration::from_millis(TICK_MS)).await;
    let record = manager.get(&id).await.unwrap();
    assert_eq!(record.status, TaskStatus::Cancelled);
    let settled_at = record.updated_at;

    // 全 tick が過ぎても engine は何も書かない
    tokio::time::sleep(Duration::from_millis(TICK_MS * (TICKS as u64 + 2))).await;
    let record = manager.get(&id).await.unwrap();
    assert_eq!(record.status, TaskStatus::Cancelled);
    assert_eq!(record.result, None);
    assert_eq!(record.updated_at, settled_at);

    let view = manager.result(&id).await.unwrap();
    assert_eq!(view.error.as_deref(), Some(CANCELLED_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_run_ends_cancelled() {
    let manager = manager();
    let id = manager.create().await.unwrap();

    tokio::time::sleep(Duration::from_millis(TICK_MS * 2 + TICK_MS / 2)).await;
    assert_eq!(manager.get(&id).await.unwrap().status, TaskStatus::Running);
    assert!(manager.cancel(&id).await.unwrap());

    let record = wait_for_task(&manager, &id, Duration::from_secs(10)).await;
    assert_eq!(record.status, TaskStatus::Cancelled);
    assert_result_invariant(&record);
}

#[tokio::test(start_paused = true)]
async fn finished_task_cannot_be_cancelled() {
    let manager = manager();
    let id = manager.create().await.unwrap();
    let done = wait_for_task(&manager, &id, Duration::from_secs(10)).await;
    assert_eq!(done.status, TaskStatus::Success);

    assert!(!manager.cancel(&id).await.unwrap());

    assert_eq!(manager.get(&id).await.unwrap(), done);
}

#[tokio::test(start_paused = true)]
async fn delete_then_not_found() {
    let manager = manager();
    let id = manager.create().await.unwrap();

    assert!(manager.delete(&id).await.unwrap());
    assert!(manager.get(&id).await.unwrap_err().is_not_found());
    assert!(!manager.delete(&id).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn delete_while_running_is_not_resurrected() {
    let manager = manager();
    let id = manager.create().await.unwrap();
    tokio::time::sleep(Duration::from_millis(TICK_MS + TICK_MS / 2)).await;
    assert_eq!(manager.get(&id).await.unwrap().status, TaskStatus::Running);

    assert!(manager.delete(&id).await.unwrap());

    tokio::time::sleep(Duration::from_millis(TICK_MS * (TICKS as u64 + 2))).await;
    assert!(manager.get(&id).await.unwrap_err().is_not_found());
    assert!(manager.list(None).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_cancels_have_exactly_one_winner() {
    let manager = TaskManagerBuilder::new()
        .engine_config(EngineConfig {
            ticks: 100,
            tick_interval_ms: 1000,
        })
        .build();
    let id = manager.create().await.unwrap();

    let joins: Vec<_> = (0..32)
        .map(|_| {
            let manager = manager.clone();
            let id = id.clone();
            tokio::spawn(async move { manager.cancel(&id).await.unwrap() })
        })
        .collect();

    let mut winners = 0;
    for join in joins {
        if join.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(manager.get(&id).await.unwrap().status, TaskStatus::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn success_filter_matches_individual_queries() {
    let manager = manager();
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(manager.create().await.unwrap());
    }
    for id in &ids {
        wait_for_task(&manager, id, Duration::from_secs(10)).await;
    }

    let listed = manager.list(Some(TaskStatus::Success)).await.unwrap();

    let mut individually = 0;
    for id in &ids {
        if manager.get(id).await.unwrap().status == TaskStatus::Success {
            individually += 1;
        }
    }
    assert_eq!(listed.len(), individually);
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|r| r.status == TaskStatus::Success));
}

struct FlakyWorkload;

#[async_trait::async_trait]
impl Workload for FlakyWorkload {
    async fn step(&self, _task_id: &TaskId, tick: u32) -> Result<(), ExecutionFault> {
        if tick == 2 {
            return Err(ExecutionFault::new("disk full"));
        }
        Ok(())
    }

    fn output(&self, _task_id: &TaskId) -> Result<String, ExecutionFault> {
        Ok(String::new())
    }
}

#[tokio::test(start_paused = true)]
async fn faults_are_recorded_as_failure() {
    let manager = TaskManagerBuilder::new()
        .workload(Arc::new(FlakyWorkload))
        .engine_config(EngineConfig {
            ticks: TICKS,
            tick_interval_ms: TICK_MS,
        })
        .build();
    let id = manager.create().await.unwrap();

    let record = wait_for_task(&manager, &id, Duration::from_secs(10)).await;

    assert_eq!(record.status, TaskStatus::Failure);
    assert_result_invariant(&record);
    let view = manager.result(&id).await.unwrap();
    assert_eq!(view.error.as_deref(), Some("disk full"));
    assert_eq!(view.result, None);

    // 終端状態は sink
    assert!(!manager.cancel(&id).await.unwrap());
    assert_eq!(manager.get(&id).await.unwrap().status, TaskStatus::Failure);
}

#[tokio::test(start_paused = true)]
async fn all_terminal_records_respect_result_invariant() {
    let manager = manager();
    let mut ids = Vec::new();
    for i in 0..6 {
        let id = manager.create().await.unwrap();
        if i % 2 == 0 {
            manager.cancel(&id).await.unwrap();
        }
        ids.push(id);
    }

    tokio::time::sleep(Duration::from_millis(TICK_MS * (TICKS as u64 + 2))).await;

    let counts = manager.counts().await.unwrap();
    assert_eq!(counts.cancelled, 3);
    assert_eq!(counts.success, 3);
    assert_eq!(counts.in_flight(), 0);
    for record in manager.list(None).await.unwrap() {
        assert!(record.is_terminal());
        assert_result_invariant(&record);
    }
}
