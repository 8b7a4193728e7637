//! 制御タスク
//!
//! 100µs周期で制御サイクル（計測 → フィルタ → 位相 → モード／デューティ）を実行します。
//! 高優先度の割り込みエグゼキュータ上で動作し、ブロックしません。

use embassy_time::{Duration, Ticker};

use crate::fmt::*;
use crate::power_stage::PwmPowerStage;
use crate::state::{SAMPLES, SETPOINTS, STATUS};
use ownverter_openloop::config::CONTROL_PERIOD_US;
use ownverter_openloop::{ControlConfig, ControlCycle};

/// コンバータ構成：単相レグ固定デューティ（DC/DC）
#[cfg(not(feature = "three-phase"))]
mod topology {
    use ownverter_openloop::{FixedDuty, Leg};

    pub const LEGS: usize = 1;
    pub type Law = FixedDuty;

    pub fn law() -> Law {
        FixedDuty::new(Leg::Leg1)
    }
}

/// コンバータ構成：三相正弦波インバータ
#[cfg(feature = "three-phase")]
mod topology {
    use ownverter_openloop::ThreePhaseSine;

    pub const LEGS: usize = 3;
    pub type Law = ThreePhaseSine;

    pub fn law() -> Law {
        ThreePhaseSine::new()
    }
}

/// デバッグログの間隔（制御周期の回数、1秒）
const LOG_INTERVAL_CYCLES: u32 = (1_000_000 / CONTROL_PERIOD_US) as u32;

/// 制御タスク（10kHz制御ループ）
#[embassy_executor::task]
pub async fn control_task(mut stage: PwmPowerStage) {
    info!("Control task started ({} legs)", topology::LEGS);

    let config = ControlConfig::default();
    let mut cycle: ControlCycle<topology::Law, { topology::LEGS }> =
        match ControlCycle::new(&config, topology::law()) {
            Ok(cycle) => cycle,
            Err(e) => {
                error!("Invalid control configuration: {}", e);
                return;
            }
        };

    let mut sensors = &SAMPLES;
    let mut ticker = Ticker::every(Duration::from_micros(CONTROL_PERIOD_US));
    let mut log_counter = 0u32;

    loop {
        ticker.next().await;

        // 設定値は1周期に1回だけスナップショットを取得
        let setpoints = SETPOINTS.get();
        let output = cycle.run(&setpoints, &mut sensors, &mut stage);
        STATUS.set(cycle.report(&setpoints));

        // デバッグログ（低頻度）
        log_counter += 1;
        if log_counter >= LOG_INTERVAL_CYCLES {
            log_counter = 0;
            debug!(
                "[Control] cycles={}, enabled={}, phase={}rad, filtered={}, duties={}",
                cycle.cycles(),
                cycle.is_power_enabled(),
                cycle.phase(),
                cycle.filtered(),
                output.duties
            );
        }
    }
}
