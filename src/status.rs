//! ステータス表示
//!
//! 制御タスクが毎周期公開し、ステータス表示タスクが読み出すボード状態です。

use crate::measurement::Channel;
use crate::mode::OperatingMode;
use crate::setpoints::Setpoints;

/// ボード状態のスナップショット
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    /// パワーステージが有効か
    pub power_enabled: bool,
    /// 制御周期の実行回数
    pub cycles: u32,
    /// 適用中の設定値
    pub setpoints: Setpoints,
    /// 生の計測値（[`Channel::index`]順）
    pub measurements: [f32; Channel::COUNT],
    /// フィルタ後の計測値
    pub filtered: f32,
    /// 位相 [rad]
    pub phase: f32,
    /// 各レグのデューティ比（未使用レグは0）
    pub duties: [f32; 3],
}

impl StatusReport {
    /// 起動直後の状態
    pub const EMPTY: Self = Self {
        power_enabled: false,
        cycles: 0,
        setpoints: Setpoints::DEFAULT,
        measurements: [0.0; Channel::COUNT],
        filtered: 0.0,
        phase: 0.0,
        duties: [0.0; 3],
    };

    pub fn measurement(&self, channel: Channel) -> f32 {
        self.measurements[channel.index()]
    }

    pub fn mode(&self) -> OperatingMode {
        self.setpoints.mode
    }
}

impl Default for StatusReport {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// LED表示パターン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedPattern {
    /// 常時点灯（アイドル）
    Steady,
    /// 点滅（パワー）
    Blink,
}

impl LedPattern {
    pub fn for_mode(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Idle => LedPattern::Steady,
            OperatingMode::Power => LedPattern::Blink,
        }
    }

    /// 表示周期ごとのLED状態
    ///
    /// # 引数
    /// * `previous` - 前回のLED状態（点灯 = `true`）
    pub fn next_level(self, previous: bool) -> bool {
        match self {
            LedPattern::Steady => true,
            LedPattern::Blink => !previous,
        }
    }
}
