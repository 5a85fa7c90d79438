//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryTaskStore**: 開発・テスト用の TaskStore
//! - **SimulatedWorkload**: 固定のプレースホルダジョブ
//!
//! 本番用の永続化実装（SQLite など）は別クレートに配置する想定です。

pub mod inmem_store;
pub mod simulated;

pub use self::inmem_store::InMemoryTaskStore;
pub use self::simulated::SimulatedWorkload;
