//! サンプリングタスク
//!
//! ADC変換を繰り返し、各チャネルの最新値を制御タスクへ公開します。
//! 制御タスクは変換が間に合わなかったチャネルについて前回値を保持します。

use embassy_stm32::{
    adc::{Adc, AnyAdcChannel},
    peripherals,
};
use embassy_time::{Duration, Ticker};

use crate::fmt::*;
use crate::hardware;
use crate::state::SAMPLES;
use ownverter_openloop::config::CONTROL_PERIOD_US;
use ownverter_openloop::Channel;

/// サンプリングタスク - 全チャネルを制御周期ごとに変換
#[embassy_executor::task]
pub async fn sampling_task(
    mut adc1: Adc<'static, peripherals::ADC1>,
    mut adc1_inputs: [(Channel, AnyAdcChannel<peripherals::ADC1>); 6],
    mut adc2: Adc<'static, peripherals::ADC2>,
    mut adc2_inputs: [(Channel, AnyAdcChannel<peripherals::ADC2>); 2],
) {
    info!("Sampling task started");

    let mut ticker = Ticker::every(Duration::from_micros(CONTROL_PERIOD_US));

    loop {
        ticker.next().await;

        for (channel, pin) in adc1_inputs.iter_mut() {
            let raw = adc1.blocking_read(pin);
            SAMPLES.publish(*channel, hardware::calibration(*channel).convert(raw));
        }
        for (channel, pin) in adc2_inputs.iter_mut() {
            let raw = adc2.blocking_read(pin);
            SAMPLES.publish(*channel, hardware::calibration(*channel).convert(raw));
        }
    }
}
