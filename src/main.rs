#![no_std]
#![no_main]

mod fmt;
mod hardware;
mod power_stage;
mod state;
mod tasks;

#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use embassy_executor::{InterruptExecutor, Spawner};
use embassy_stm32::{
    adc::{Adc, AdcChannel, SampleTime},
    gpio::{Level, Output, Speed},
    interrupt,
    interrupt::{InterruptExt, Priority},
    usart::{Config as UartConfig, UartRx},
};
use embassy_time::{Duration, Timer};

use fmt::*;
use hardware::Irqs;
use ownverter_openloop::config::{CONTROL_PERIOD_US, FILTER_TIME_CONSTANT_S};
use ownverter_openloop::Channel;
use power_stage::PwmPowerStage;
use tasks::{command_task, control_task, sampling_task, status_task};

/// 制御タスク専用の高優先度エグゼキュータ
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn UART4() {
    EXECUTOR_HIGH.on_interrupt()
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // ハードウェア初期化
    let config = hardware::create_clock_config();
    let p = embassy_stm32::init(config);

    info!("═══════════════════════════════════════════════════");
    info!("   OwnVerter open-loop converter • STM32G474 @ 170MHz");
    info!("═══════════════════════════════════════════════════");
    info!(
        "Control period: {}us, filter time constant: {}s",
        CONTROL_PERIOD_US, FILTER_TIME_CONSTANT_S
    );
    info!("Press 'h' on the serial console for help");

    // LED初期化＆ステータス表示タスク起動
    let led = Output::new(p.PC6, Level::High, Speed::Low);
    spawner.spawn(status_task(led)).unwrap();

    // シリアルコンソール（LPUART1 RX）＆コマンドタスク起動
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = hardware::CONSOLE_BAUDRATE;
    let console_rx = UartRx::new(p.LPUART1, Irqs, p.PA3, p.DMA1_CH1, uart_config).unwrap();
    spawner.spawn(command_task(console_rx)).unwrap();

    // ADC初期化＆サンプリングタスク起動
    let mut adc1 = Adc::new(p.ADC1);
    adc1.set_sample_time(SampleTime::CYCLES47_5);
    let mut adc2 = Adc::new(p.ADC2);
    adc2.set_sample_time(SampleTime::CYCLES47_5);

    let adc1_inputs = [
        (Channel::V1Low, p.PA0.degrade_adc()),
        (Channel::V2Low, p.PA1.degrade_adc()),
        (Channel::V3Low, p.PC0.degrade_adc()),
        (Channel::I1Low, p.PC1.degrade_adc()),
        (Channel::I2Low, p.PC2.degrade_adc()),
        (Channel::I3Low, p.PC3.degrade_adc()),
    ];
    let adc2_inputs = [
        (Channel::VHigh, p.PC4.degrade_adc()),
        (Channel::IHigh, p.PC5.degrade_adc()),
    ];
    spawner
        .spawn(sampling_task(adc1, adc1_inputs, adc2, adc2_inputs))
        .unwrap();

    // PWM初期化（TIM1、3レグ相補PWM）
    let stage = PwmPowerStage::new(hardware::create_leg_pwm(
        p.TIM1, p.PA8, p.PB13, p.PA9, p.PB14, p.PA10, p.PB15,
    ));

    // 制御タスクを高優先度エグゼキュータで起動（バックグラウンドタスクより優先）
    interrupt::UART4.set_priority(Priority::P6);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::UART4);
    high_spawner.spawn(control_task(stage)).unwrap();

    info!("Control loop started");

    // メインループ（将来の拡張用）
    loop {
        Timer::after(Duration::from_millis(1000)).await;
    }
}
