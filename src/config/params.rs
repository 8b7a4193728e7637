//! 制御とハードウェアの設定パラメータ（デフォルト値）

/// 制御周期 [s]（100µs = 10kHz）
pub const CONTROL_PERIOD_S: f32 = 100e-6;

/// 制御周期 [µs]（タイマ登録用の整数値、秒の値から丸めて算出）
pub const CONTROL_PERIOD_US: u64 = (CONTROL_PERIOD_S * 1.0e6 + 0.5) as u64;

/// ローパスフィルタの時定数 [s]
pub const FILTER_TIME_CONSTANT_S: f32 = 5e-3;

/// ステータス表示周期 [ms]
pub const STATUS_PERIOD_MS: u64 = 200;

/// 起動時の設定値
pub mod setpoints {
    /// 単相レグのデューティ比（0.0-1.0）
    pub const DEFAULT_DUTY: f32 = 0.5;

    /// 三相正弦波の振幅（デューティ比単位）
    pub const DEFAULT_AMPLITUDE: f32 = 0.0;

    /// 三相正弦波のオフセット（デューティ比単位）
    pub const DEFAULT_OFFSET: f32 = 0.5;

    /// 三相正弦波の周波数 [Hz]
    pub const DEFAULT_FREQUENCY_HZ: f32 = 50.0;
}

/// ユーザー操作1回あたりの変化量
pub mod increments {
    /// デューティ比 / 振幅の増減幅
    pub const DUTY_STEP: f32 = 0.05;

    /// 周波数の増減幅 [Hz]
    pub const FREQUENCY_STEP_HZ: f32 = 10.0;
}

/// 設定値の上限
pub mod limits {
    /// 周波数の上限 [Hz]（制御周期に対して十分低く保つ）
    pub const FREQUENCY_MAX_HZ: f32 = 1000.0;
}

/// PWM設定
pub mod pwm {
    /// PWM周波数 [Hz]
    pub const FREQUENCY_HZ: u32 = 200_000;

    /// デッドタイム（タイマカウント）
    pub const DEAD_TIME: u16 = 17;
}
