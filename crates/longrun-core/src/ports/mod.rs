//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（永続化媒体、時刻、ID 生成、タスク本体）への
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod clock;
pub mod id_generator;
pub mod task_store;
pub mod workload;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::task_store::TaskStore;
pub use self::workload::{ExecutionFault, Workload};
