//! コマンドタスク
//!
//! シリアルコンソールから1文字ずつ受信し、設定値を更新します。

use embassy_stm32::{mode::Async, usart::UartRx};

use crate::fmt::*;
use crate::state::SETPOINTS;
use ownverter_openloop::command::HELP_MENU;
use ownverter_openloop::{Command, ControlConfig, OperatingMode};

/// コマンドタスク - キー入力を待ち、設定値に反映
#[embassy_executor::task]
pub async fn command_task(mut rx: UartRx<'static, Async>) {
    info!("Command task started");

    let adjustments = ControlConfig::default().adjustments;
    let mut buf = [0u8; 1];

    loop {
        if let Err(e) = rx.read(&mut buf).await {
            warn!("Console RX error: {}", e);
            continue;
        }

        let Some(command) = Command::from_byte(buf[0]) else {
            continue;
        };

        if command == Command::Help {
            for line in HELP_MENU {
                info!("{}", line);
            }
            continue;
        }

        // 構造体全体を1つのクリティカルセクションで更新（制御タスクは一括で読み出す）
        let (setpoints, _) = SETPOINTS.update(|sp| sp.apply(command, &adjustments));

        match command {
            Command::Idle => info!("Idle mode request"),
            Command::Power => info!(
                "Power mode request (duty {}, amplitude {}, {}Hz)",
                setpoints.duty, setpoints.amplitude, setpoints.frequency_hz
            ),
            Command::DutyUp | Command::DutyDown => info!(
                "Duty {} / amplitude {}",
                setpoints.duty, setpoints.amplitude
            ),
            Command::FrequencyUp | Command::FrequencyDown => {
                info!("Frequency {}Hz", setpoints.frequency_hz)
            }
            Command::Help => {}
        }

        if setpoints.mode == OperatingMode::Power
            && !(0.0..=1.0).contains(&setpoints.duty)
        {
            warn!("Duty setpoint {} out of range, output saturated", setpoints.duty);
        }
    }
}
