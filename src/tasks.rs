//! タスクモジュール
//!
//! 各タスクの実装を分離して管理します。

pub mod command;
pub mod control;
pub mod sampling;
pub mod status;

// タスク関数を再エクスポート
pub use command::command_task;
pub use control::control_task;
pub use sampling::sampling_task;
pub use status::status_task;
