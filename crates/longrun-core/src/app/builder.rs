//! TaskManagerBuilder - TaskManager の構築とワイヤリング
//!
//! 差し替えなかった部品は既定実装になります：
//! - store: `InMemoryTaskStore`
//! - workload: `SimulatedWorkload`
//! - ids: `UlidGenerator<SystemClock>`
//! - engine: `EngineConfig::default()`（10 tick × 1 秒）

use std::sync::Arc;

use crate::config::{Config, EngineConfig};
use crate::impls::{InMemoryTaskStore, SimulatedWorkload};
use crate::ports::{IdGenerator, SystemClock, TaskStore, UlidGenerator, Workload};

use super::engine::ExecutionEngine;
use super::manager::TaskManager;

/// # 使用例
/// ```ignore
/// let manager = TaskManagerBuilder::from_config(&config)
///     .store(Arc::new(MyStore::connect(url)?))
///     .build();
/// let id = manager.create().await?;
/// ```
#[derive(Default)]
pub struct TaskManagerBuilder {
    store: Option<Arc<dyn TaskStore>>,
    workload: Option<Arc<dyn Workload>>,
    ids: Option<Arc<dyn IdGenerator>>,
    engine: EngineConfig,
}

impl TaskManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new().engine_config(config.engine.clone())
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn workload(mut self, workload: Arc<dyn Workload>) -> Self {
        self.workload = Some(workload);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn build(self) -> TaskManager {
        let store: Arc<dyn TaskStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryTaskStore::new()),
        };
        let workload: Arc<dyn Workload> = match self.workload {
            Some(workload) => workload,
            None => Arc::new(SimulatedWorkload::new()),
        };
        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(SystemClock)),
        };

        let engine = ExecutionEngine::new(Arc::clone(&store), workload, &self.engine);
        TaskManager::new(store, engine, ids)
    }
}
