//! ステータス表示タスク
//!
//! ボードの計測値と設定値を定期的にログ出力し、LEDでモードを表示します
//! （アイドル：常時点灯、パワー：点滅）。

use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};

use crate::fmt::*;
use crate::state::STATUS;
use ownverter_openloop::config::STATUS_PERIOD_MS;
use ownverter_openloop::{Channel, LedPattern, OperatingMode};

/// ステータス表示タスク
#[embassy_executor::task]
pub async fn status_task(mut led: Output<'static>) {
    info!("Status task started");

    let mut led_on = true;

    loop {
        let status = STATUS.get();

        led_on = LedPattern::for_mode(status.mode()).next_level(led_on);
        if led_on {
            led.set_high();
        } else {
            led.set_low();
        }

        match status.mode() {
            OperatingMode::Idle => info!(
                "IDL: Vl {}V, Il {}A | Vh {}V (filt {}V), Ih {}A",
                status.measurement(Channel::V1Low),
                status.measurement(Channel::I1Low),
                status.measurement(Channel::VHigh),
                status.filtered,
                status.measurement(Channel::IHigh)
            ),
            OperatingMode::Power => info!(
                "POW: d {}, f {}Hz, duties {} | Vl {}V, Il {}A | Vh {}V (filt {}V), Ih {}A",
                status.setpoints.duty,
                status.setpoints.frequency_hz,
                status.duties,
                status.measurement(Channel::V1Low),
                status.measurement(Channel::I1Low),
                status.measurement(Channel::VHigh),
                status.filtered,
                status.measurement(Channel::IHigh)
            ),
        }

        Timer::after(Duration::from_millis(STATUS_PERIOD_MS)).await;
    }
}
