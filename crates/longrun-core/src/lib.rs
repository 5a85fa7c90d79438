//! longrun-core
//!
//! Task lifecycle core for the long-running tasks service: clients create a
//! task, get an id back immediately, and poll status/result while the work
//! runs in the background.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, state, task, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, Workload, IdGenerator, Clock）
//! - **impls**: 実装（InMemoryTaskStore, SimulatedWorkload）
//! - **app**: アプリケーションロジック（builder, manager, engine, status）
//! - **config**: TOML 設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{RunOutcome, TaskManager, TaskManagerBuilder, TaskResultView};
pub use config::{Config, ConfigError, EngineConfig};
pub use domain::{StoreError, TaskError, TaskId, TaskRecord, TaskStatus};
