//! グローバル共有状態管理
//!
//! タスク間で共有される状態をクリティカルセクションで保護して管理します。

use ownverter_openloop::{SampleBank, Setpoints, Shared, StatusReport};

/// ユーザー設定値（コマンドタスクが書き込み、制御タスクが毎周期読み出し）
pub static SETPOINTS: Shared<Setpoints> = Shared::new(Setpoints::DEFAULT);

/// ボード状態（制御タスクが毎周期書き込み、ステータス表示タスクが読み出し）
pub static STATUS: Shared<StatusReport> = Shared::new(StatusReport::EMPTY);

/// 各チャネルの最新変換値（サンプリングタスク → 制御タスク）
pub static SAMPLES: SampleBank = SampleBank::new();
