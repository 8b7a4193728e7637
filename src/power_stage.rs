//! パワーステージドライバー
//!
//! TIM1の相補PWMを`PowerStage`トレイトとして公開し、
//! 制御コアからデューティ比（0.0-1.0）と起動/停止で操作できるようにします。

use embassy_stm32::{
    peripherals,
    timer::{complementary_pwm::ComplementaryPwm, Channel},
};
use libm::roundf;

use ownverter_openloop::{Leg, LegSet, PowerStage};

/// レグに対応するタイマチャネル
fn channel(leg: Leg) -> Channel {
    match leg {
        Leg::Leg1 => Channel::Ch1,
        Leg::Leg2 => Channel::Ch2,
        Leg::Leg3 => Channel::Ch3,
    }
}

/// 3レグのハーフブリッジを駆動するパワーステージ
pub struct PwmPowerStage {
    pwm: ComplementaryPwm<'static, peripherals::TIM1>,
    max_duty: u16,
}

impl PwmPowerStage {
    /// 新しいパワーステージを作成
    ///
    /// # 引数
    /// * `pwm` - PWMペリフェラル（TIM1）
    pub fn new(pwm: ComplementaryPwm<'static, peripherals::TIM1>) -> Self {
        let max_duty = pwm.get_max_duty();
        Self { pwm, max_duty }
    }

    /// デューティ比（0.0-1.0）をタイマのコンペア値に変換
    fn compare_value(&self, duty: f32) -> u16 {
        let max = self.max_duty as f32;
        roundf(duty * max).clamp(0.0, max) as u16
    }
}

impl PowerStage for PwmPowerStage {
    fn start(&mut self, legs: LegSet) {
        for leg in Leg::ALL {
            if legs.contains(leg) {
                self.pwm.enable(channel(leg));
            }
        }
    }

    /// 対象レグのDuty比を0にして無効化
    fn stop(&mut self, legs: LegSet) {
        for leg in Leg::ALL {
            if legs.contains(leg) {
                self.pwm.set_duty(channel(leg), 0);
                self.pwm.disable(channel(leg));
            }
        }
    }

    fn set_duty_cycle(&mut self, leg: Leg, duty: f32) {
        let compare = self.compare_value(duty);
        self.pwm.set_duty(channel(leg), compare);
    }
}
