//! App - アプリケーション層
//!
//! ports を組み合わせてタスクのライフサイクルを実装します。
//!
//! # 主要コンポーネント
//! - **TaskManagerBuilder**: 構築とワイヤリング
//! - **TaskManager**: create / get / list / cancel / delete のファサード
//! - **ExecutionEngine**: 1 タスクの実行とキャンセル観測
//! - **status**: 呼び出し側向けのビュー

pub mod builder;
pub mod engine;
pub mod manager;
pub mod status;

// 主要な型を再エクスポート
pub use self::builder::TaskManagerBuilder;
pub use self::engine::{ExecutionEngine, RunOutcome};
pub use self::manager::TaskManager;
pub use self::status::{
    CANCELLED_MESSAGE, ServiceInfo, StatusCounts, TaskResultView, TaskStatusView,
};
