//! ユーザー設定値
//!
//! コマンドタスクが書き込み、制御タスクが毎周期スナップショットとして読み出す設定値です。
//! 周波数はここで [0, 上限] に飽和させます。デューティ比の飽和はデューティ生成側で行います。

use crate::command::Command;
use crate::config::params::{increments, limits, setpoints};
use crate::mode::OperatingMode;

/// 設定値のスナップショット
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setpoints {
    /// 要求モード
    pub mode: OperatingMode,
    /// 単相レグのデューティ比
    pub duty: f32,
    /// 三相正弦波の振幅（デューティ比単位）
    pub amplitude: f32,
    /// 三相正弦波のオフセット（デューティ比単位）
    pub offset: f32,
    /// 三相正弦波の周波数 [Hz]
    pub frequency_hz: f32,
}

impl Setpoints {
    /// 起動時の設定値
    pub const DEFAULT: Self = Self {
        mode: OperatingMode::Idle,
        duty: setpoints::DEFAULT_DUTY,
        amplitude: setpoints::DEFAULT_AMPLITUDE,
        offset: setpoints::DEFAULT_OFFSET,
        frequency_hz: setpoints::DEFAULT_FREQUENCY_HZ,
    };

    /// コマンドを適用
    ///
    /// # 戻り値
    /// 設定値が変化した場合 `true`
    pub fn apply(&mut self, command: Command, adjustments: &Adjustments) -> bool {
        let before = *self;
        match command {
            Command::Idle => self.mode = OperatingMode::Idle,
            Command::Power => self.mode = OperatingMode::Power,
            Command::DutyUp => {
                self.duty += adjustments.duty_step;
                self.amplitude += adjustments.duty_step;
            }
            Command::DutyDown => {
                self.duty -= adjustments.duty_step;
                self.amplitude -= adjustments.duty_step;
            }
            Command::FrequencyUp => {
                self.frequency_hz = adjustments
                    .clamp_frequency(self.frequency_hz + adjustments.frequency_step_hz);
            }
            Command::FrequencyDown => {
                self.frequency_hz = adjustments
                    .clamp_frequency(self.frequency_hz - adjustments.frequency_step_hz);
            }
            Command::Help => {}
        }
        *self != before
    }
}

impl Default for Setpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 1回の操作での増減幅と周波数上限
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    /// デューティ比 / 振幅の増減幅
    pub duty_step: f32,
    /// 周波数の増減幅 [Hz]
    pub frequency_step_hz: f32,
    /// 周波数の上限 [Hz]
    pub frequency_max_hz: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            duty_step: increments::DUTY_STEP,
            frequency_step_hz: increments::FREQUENCY_STEP_HZ,
            frequency_max_hz: limits::FREQUENCY_MAX_HZ,
        }
    }
}

impl Adjustments {
    /// 周波数を [0, 上限] に飽和（NaNは0）
    pub fn clamp_frequency(&self, frequency_hz: f32) -> f32 {
        if frequency_hz.is_nan() {
            return 0.0;
        }
        frequency_hz.clamp(0.0, self.frequency_max_hz)
    }
}
