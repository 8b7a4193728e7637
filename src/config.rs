//! Configuration module
//!
//! 制御周期・フィルタ時定数・設定値の増減幅など、制御コアの設定を提供します。

pub mod params;

pub use params::*;

use crate::filter::FilterError;
use crate::measurement::Channel;
use crate::setpoints::Adjustments;

/// 設定検証のエラー型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// 制御周期が正の有限値でない
    InvalidPeriod,

    /// フィルタ時定数が正の有限値でない
    InvalidTimeConstant,

    /// 周波数上限が正の有限値でない
    InvalidFrequencyLimit,

    /// 取得チャネルが1つもない
    NoChannels,

    /// フィルタ対象のチャネルが取得対象に含まれていない
    FilteredChannelNotAcquired,
}

impl From<FilterError> for ConfigError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::InvalidPeriod => ConfigError::InvalidPeriod,
            FilterError::InvalidTimeConstant => ConfigError::InvalidTimeConstant,
        }
    }
}

/// 制御コアの実行時設定
#[derive(Debug, Clone, Copy)]
pub struct ControlConfig {
    /// 制御周期 [s]
    pub period_s: f32,
    /// ローパスフィルタの時定数 [s]
    pub filter_time_constant_s: f32,
    /// 毎周期取得する計測チャネル
    pub channels: &'static [Channel],
    /// ローパスフィルタを適用するチャネル
    pub filtered_channel: Channel,
    /// ユーザー操作による設定値の増減幅と上限
    pub adjustments: Adjustments,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            period_s: CONTROL_PERIOD_S,
            filter_time_constant_s: FILTER_TIME_CONSTANT_S,
            channels: &Channel::ALL,
            filtered_channel: Channel::VHigh,
            adjustments: Adjustments::default(),
        }
    }
}

impl ControlConfig {
    /// 設定値の妥当性をチェック
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.period_s.is_finite() && self.period_s > 0.0) {
            return Err(ConfigError::InvalidPeriod);
        }
        if !(self.filter_time_constant_s.is_finite() && self.filter_time_constant_s > 0.0) {
            return Err(ConfigError::InvalidTimeConstant);
        }
        let max_hz = self.adjustments.frequency_max_hz;
        if !(max_hz.is_finite() && max_hz > 0.0) {
            return Err(ConfigError::InvalidFrequencyLimit);
        }
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if !self.channels.contains(&self.filtered_channel) {
            return Err(ConfigError::FilteredChannelNotAcquired);
        }
        Ok(())
    }
}
