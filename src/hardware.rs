//! ハードウェア初期化モジュール
//!
//! ペリフェラルの初期化ロジックとボード固有の定数を集約します。

use embassy_stm32::{
    bind_interrupts,
    gpio::OutputType,
    peripherals,
    time::Hertz,
    timer::{
        complementary_pwm::{ComplementaryPwm, ComplementaryPwmPin},
        low_level::CountingMode,
        simple_pwm::PwmPin,
        Channel,
    },
    usart, Config, Peri,
};

use ownverter_openloop::config::pwm;
use ownverter_openloop::measurement::AdcCalibration;
use ownverter_openloop::Channel as MeasurementChannel;

// シリアルコンソールの割り込みをバインド
bind_interrupts!(pub struct Irqs {
    LPUART1 => usart::InterruptHandler<peripherals::LPUART1>;
});

/// シリアルコンソールのボーレート
pub const CONSOLE_BAUDRATE: u32 = 115_200;

/// ADC分解能（12ビット）
const ADC_MAX: f32 = 4096.0;

/// ADC基準電圧 [V]
const VREF: f32 = 3.3;

/// 電圧センサの分圧比（低圧側・DCバス共通）
const VOLTAGE_DIVIDER_RATIO: f32 = 30.0;

/// 電流センサの感度 [V/A]
const CURRENT_SENSITIVITY: f32 = 0.1;

/// 電流センサのゼロ点電圧 [V]
const CURRENT_ZERO_V: f32 = VREF / 2.0;

/// 各チャネルのADC生値 → 物理量の変換係数
pub fn calibration(channel: MeasurementChannel) -> AdcCalibration {
    let volts_per_count = VREF / ADC_MAX;
    match channel {
        MeasurementChannel::V1Low
        | MeasurementChannel::V2Low
        | MeasurementChannel::V3Low
        | MeasurementChannel::VHigh => {
            AdcCalibration::new(volts_per_count * VOLTAGE_DIVIDER_RATIO, 0.0)
        }
        MeasurementChannel::I1Low
        | MeasurementChannel::I2Low
        | MeasurementChannel::I3Low
        | MeasurementChannel::IHigh => AdcCalibration::new(
            volts_per_count / CURRENT_SENSITIVITY,
            -CURRENT_ZERO_V / CURRENT_SENSITIVITY,
        ),
    }
}

/// RCCクロック設定を初期化
///
/// HSI → PLL（÷4 × 85 ÷ 2）で170MHz生成
pub fn create_clock_config() -> Config {
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::mux::{Adc12sel, ClockMux};
        use embassy_stm32::rcc::{Pll, PllMul, PllPreDiv, PllRDiv, PllSource, Sysclk};

        config.rcc.hsi = true;
        config.rcc.pll = Some(Pll {
            source: PllSource::HSI,
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL85,
            divp: None,
            divq: None,
            divr: Some(PllRDiv::DIV2),
        });
        config.rcc.sys = Sysclk::PLL1_R; // システムクロックをPLLに設定

        let mut clock_mux = ClockMux::default();
        clock_mux.adc12sel = Adc12sel::SYS;
        config.rcc.mux = clock_mux;
    }
    config
}

/// TIM1の3レグ相補PWMを初期化（全チャネル無効の状態で返す）
///
/// Leg1 = CH1/CH1N、Leg2 = CH2/CH2N、Leg3 = CH3/CH3N
pub fn create_leg_pwm(
    tim: Peri<'static, peripherals::TIM1>,
    leg1_high: Peri<'static, peripherals::PA8>,
    leg1_low: Peri<'static, peripherals::PB13>,
    leg2_high: Peri<'static, peripherals::PA9>,
    leg2_low: Peri<'static, peripherals::PB14>,
    leg3_high: Peri<'static, peripherals::PA10>,
    leg3_low: Peri<'static, peripherals::PB15>,
) -> ComplementaryPwm<'static, peripherals::TIM1> {
    let mut leg_pwm = ComplementaryPwm::new(
        tim,
        Some(PwmPin::new(leg1_high, OutputType::PushPull)),
        Some(ComplementaryPwmPin::new(leg1_low, OutputType::PushPull)),
        Some(PwmPin::new(leg2_high, OutputType::PushPull)),
        Some(ComplementaryPwmPin::new(leg2_low, OutputType::PushPull)),
        Some(PwmPin::new(leg3_high, OutputType::PushPull)),
        Some(ComplementaryPwmPin::new(leg3_low, OutputType::PushPull)),
        None,
        None,
        Hertz(pwm::FREQUENCY_HZ),
        CountingMode::CenterAlignedBothInterrupts,
    );
    leg_pwm.disable(Channel::Ch1);
    leg_pwm.disable(Channel::Ch2);
    leg_pwm.disable(Channel::Ch3);
    leg_pwm.set_dead_time(pwm::DEAD_TIME);
    leg_pwm
}
