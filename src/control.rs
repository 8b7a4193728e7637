//! Control cycle
//!
//! Entry point called once per control period. Order within a cycle:
//! 1. acquire every configured measurement channel
//! 2. low-pass filter the selected channel
//! 3. advance the phase reference
//! 4. step the mode machine; in power mode compute and apply the duty
//!    commands, issuing start on the rising edge; in idle issue stop on the
//!    falling edge
//!
//! A cycle does no allocation, never blocks and only loops over fixed-size
//! arrays, so its execution time does not depend on the data.

use crate::config::{ConfigError, ControlConfig};
use crate::duty::DutyLaw;
use crate::filter::LowPassFilter;
use crate::fmt::*;
use crate::hal::{LegSet, PowerStage, Sensors};
use crate::measurement::{Channel, Measurements};
use crate::mode::{Action, ModeMachine, OperatingMode};
use crate::phase::PhaseAccumulator;
use crate::setpoints::Setpoints;
use crate::status::StatusReport;

/// Result of one control cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutput<const N: usize> {
    /// Edge action issued to the power stage this cycle
    pub action: Action,
    /// Duty commands applied this cycle (`None` in idle mode)
    pub duties: Option<[f32; N]>,
}

/// Periodic control loop state
pub struct ControlCycle<L, const N: usize> {
    period_s: f32,
    channels: &'static [Channel],
    filtered_channel: Channel,
    measurements: Measurements,
    filter: LowPassFilter,
    filter_seeded: bool,
    phase: PhaseAccumulator,
    mode: ModeMachine,
    law: L,
    duties: [f32; N],
    cycles: u32,
}

impl<L: DutyLaw<N>, const N: usize> ControlCycle<L, N> {
    /// Create the control loop for `law`
    ///
    /// # Errors
    /// Any [`ConfigError`] reported by [`ControlConfig::validate`]
    pub fn new(config: &ControlConfig, law: L) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter = LowPassFilter::new(config.period_s, config.filter_time_constant_s)?;

        Ok(Self {
            period_s: config.period_s,
            channels: config.channels,
            filtered_channel: config.filtered_channel,
            measurements: Measurements::new(),
            filter,
            filter_seeded: false,
            phase: PhaseAccumulator::new(),
            mode: ModeMachine::new(),
            law,
            duties: [0.0; N],
            cycles: 0,
        })
    }

    /// Run one control period against `setpoints`, read once by the caller
    pub fn run<S, P>(
        &mut self,
        setpoints: &Setpoints,
        sensors: &mut S,
        stage: &mut P,
    ) -> CycleOutput<N>
    where
        S: Sensors,
        P: PowerStage,
    {
        self.cycles = self.cycles.wrapping_add(1);

        // 1. Measurements, regardless of mode
        let mut filtered_fresh = false;
        for &channel in self.channels {
            let fresh = self.measurements.update(channel, sensors.latest(channel));
            if fresh && channel == self.filtered_channel {
                filtered_fresh = true;
            }
        }

        // 2. Filter. The first genuine sample seeds the accumulator so the
        // output does not crawl up from zero after reset.
        let input = self.measurements.get(self.filtered_channel);
        if self.filter_seeded {
            self.filter.update(input);
        } else if filtered_fresh {
            self.filter.reset(input);
            self.filter_seeded = true;
        }

        // 3. Phase reference
        self.phase.advance_hz(setpoints.frequency_hz, self.period_s);

        // 4. Mode
        let action = self.mode.step(setpoints.mode);
        let duties = match setpoints.mode {
            OperatingMode::Power => {
                self.duties = self.law.duties(setpoints, self.phase.angle());
                for (leg, &duty) in self.law.legs().iter().zip(self.duties.iter()) {
                    stage.set_duty_cycle(*leg, duty);
                }
                if action == Action::Start {
                    stage.start(self.law.active_legs());
                    info!("Power stage started");
                }
                Some(self.duties)
            }
            OperatingMode::Idle => {
                if action == Action::Stop {
                    stage.stop(LegSet::All);
                    info!("Power stage stopped");
                }
                None
            }
        };

        CycleOutput { action, duties }
    }

    /// Snapshot for the status display
    pub fn report(&self, setpoints: &Setpoints) -> StatusReport {
        let mut duties = [0.0; 3];
        if self.mode.is_enabled() {
            for (dst, src) in duties.iter_mut().zip(self.duties.iter()) {
                *dst = *src;
            }
        }

        StatusReport {
            power_enabled: self.mode.is_enabled(),
            cycles: self.cycles,
            setpoints: *setpoints,
            measurements: self.measurements.values(),
            filtered: self.filter.output(),
            phase: self.phase.angle(),
            duties,
        }
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    pub fn filtered(&self) -> f32 {
        self.filter.output()
    }

    pub fn phase(&self) -> f32 {
        self.phase.angle()
    }

    pub fn is_power_enabled(&self) -> bool {
        self.mode.is_enabled()
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duty::{FixedDuty, ThreePhaseSine};
    use crate::hal::Leg;
    use crate::measurement::SampleBank;
    use core::f32::consts::TAU;

    /// Records every power-stage call
    #[derive(Default)]
    struct RecordingStage {
        starts: u32,
        stops: u32,
        started: Option<LegSet>,
        duty_writes: u32,
        last_duty: [Option<f32>; 3],
        running: bool,
    }

    impl PowerStage for RecordingStage {
        fn start(&mut self, legs: LegSet) {
            self.starts += 1;
            self.started = Some(legs);
            self.running = true;
        }

        fn stop(&mut self, _legs: LegSet) {
            self.stops += 1;
            self.running = false;
        }

        fn set_duty_cycle(&mut self, leg: Leg, duty: f32) {
            self.duty_writes += 1;
            self.last_duty[leg.index()] = Some(duty);
        }
    }

    /// Never has a fresh sample
    struct Silent;

    impl Sensors for Silent {
        fn latest(&mut self, _channel: Channel) -> Option<f32> {
            None
        }
    }

    fn single_leg() -> ControlCycle<FixedDuty, 1> {
        ControlCycle::new(&ControlConfig::default(), FixedDuty::new(Leg::Leg1)).unwrap()
    }

    fn with_mode(mode: OperatingMode) -> Setpoints {
        Setpoints {
            mode,
            ..Setpoints::default()
        }
    }

    #[test]
    fn test_start_stop_fire_once_per_edge() {
        use OperatingMode::*;

        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();

        for mode in [Idle, Power, Power, Idle, Idle, Power] {
            cycle.run(&with_mode(mode), &mut Silent, &mut stage);
        }

        assert_eq!(stage.starts, 2);
        assert_eq!(stage.stops, 1);
        assert!(stage.running);
        assert!(cycle.is_power_enabled());
    }

    #[test]
    fn test_duty_applied_every_power_cycle() {
        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();
        let sp = Setpoints {
            mode: OperatingMode::Power,
            duty: 0.3,
            ..Setpoints::default()
        };

        for _ in 0..10 {
            let out = cycle.run(&sp, &mut Silent, &mut stage);
            assert_eq!(out.duties, Some([0.3]));
        }
        assert_eq!(stage.duty_writes, 10);
        assert_eq!(stage.starts, 1);
        assert_eq!(stage.started, Some(LegSet::One(Leg::Leg1)));
        assert_eq!(stage.last_duty, [Some(0.3), None, None]);
    }

    #[test]
    fn test_idle_applies_no_duty() {
        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();

        for _ in 0..5 {
            let out = cycle.run(&with_mode(OperatingMode::Idle), &mut Silent, &mut stage);
            assert_eq!(out.action, Action::None);
            assert_eq!(out.duties, None);
        }
        assert_eq!(stage.duty_writes, 0);
        assert_eq!(stage.starts, 0);
        assert_eq!(stage.stops, 0);
    }

    #[test]
    fn test_out_of_range_duty_is_clamped() {
        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();
        let sp = Setpoints {
            mode: OperatingMode::Power,
            duty: 10.0,
            ..Setpoints::default()
        };

        let out = cycle.run(&sp, &mut Silent, &mut stage);
        assert_eq!(out.duties, Some([1.0]));
        assert_eq!(stage.last_duty[0], Some(1.0));
    }

    #[test]
    fn test_three_phase_drives_all_legs() {
        let mut cycle: ControlCycle<ThreePhaseSine, 3> =
            ControlCycle::new(&ControlConfig::default(), ThreePhaseSine::new()).unwrap();
        let mut stage = RecordingStage::default();
        let sp = Setpoints {
            mode: OperatingMode::Power,
            amplitude: 10.0,
            offset: 0.5,
            ..Setpoints::default()
        };

        for _ in 0..50 {
            let out = cycle.run(&sp, &mut Silent, &mut stage);
            for duty in out.duties.unwrap() {
                assert!((0.0..=1.0).contains(&duty));
            }
        }
        assert_eq!(stage.started, Some(LegSet::All));
        assert_eq!(stage.duty_writes, 150);
        assert!(stage.last_duty.iter().all(Option::is_some));
    }

    #[test]
    fn test_measurements_run_in_idle_and_hold_stale_values() {
        let bank = SampleBank::new();
        let mut sensors = &bank;
        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();
        let idle = with_mode(OperatingMode::Idle);

        bank.publish(Channel::VHigh, 48.0);
        bank.publish(Channel::I1Low, 1.25);
        cycle.run(&idle, &mut sensors, &mut stage);
        assert_eq!(cycle.measurements().get(Channel::VHigh), 48.0);
        assert_eq!(cycle.measurements().get(Channel::I1Low), 1.25);

        // 新しいサンプルなし → 前回値を保持
        for _ in 0..10 {
            cycle.run(&idle, &mut sensors, &mut stage);
        }
        assert_eq!(cycle.measurements().get(Channel::VHigh), 48.0);
        assert_eq!(cycle.measurements().get(Channel::I1Low), 1.25);

        bank.publish(Channel::I1Low, -0.5);
        cycle.run(&idle, &mut sensors, &mut stage);
        assert_eq!(cycle.measurements().get(Channel::I1Low), -0.5);
    }

    #[test]
    fn test_filter_is_seeded_then_tracks() {
        let bank = SampleBank::new();
        let mut sensors = &bank;
        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();
        let idle = with_mode(OperatingMode::Idle);

        // 最初のサンプルまではフィルタ出力0
        cycle.run(&idle, &mut sensors, &mut stage);
        assert_eq!(cycle.filtered(), 0.0);

        bank.publish(Channel::VHigh, 24.0);
        cycle.run(&idle, &mut sensors, &mut stage);
        assert_eq!(cycle.filtered(), 24.0);

        // ステップ入力に対して一次遅れで追従
        for _ in 0..151 {
            bank.publish(Channel::VHigh, 48.0);
            cycle.run(&idle, &mut sensors, &mut stage);
        }
        let filtered = cycle.filtered();
        assert!(filtered > 24.0 + 0.95 * 24.0 && filtered < 48.0, "{}", filtered);
    }

    #[test]
    fn test_phase_runs_in_idle_and_continues_into_power() {
        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();
        let idle = Setpoints {
            frequency_hz: 50.0,
            ..Setpoints::default()
        };

        for _ in 0..10 {
            cycle.run(&idle, &mut Silent, &mut stage);
        }
        let before = cycle.phase();
        assert!((before - 10.0 * TAU * 50.0 * 100e-6).abs() < 1e-4);

        let power = Setpoints {
            mode: OperatingMode::Power,
            ..idle
        };
        cycle.run(&power, &mut Silent, &mut stage);
        assert!(cycle.phase() > before);
    }

    #[test]
    fn test_report_reflects_state() {
        let bank = SampleBank::new();
        let mut sensors = &bank;
        let mut cycle = single_leg();
        let mut stage = RecordingStage::default();
        let sp = Setpoints {
            mode: OperatingMode::Power,
            duty: 0.6,
            ..Setpoints::default()
        };

        bank.publish(Channel::IHigh, 2.0);
        cycle.run(&sp, &mut sensors, &mut stage);
        let report = cycle.report(&sp);

        assert!(report.power_enabled);
        assert_eq!(report.cycles, 1);
        assert_eq!(report.duties, [0.6, 0.0, 0.0]);
        assert_eq!(report.measurement(Channel::IHigh), 2.0);
        assert_eq!(report.setpoints, sp);

        let idle = with_mode(OperatingMode::Idle);
        cycle.run(&idle, &mut sensors, &mut stage);
        assert_eq!(cycle.report(&idle).duties, [0.0; 3]);
    }

    #[test]
    fn test_unfiltered_channels_only() {
        let bank = SampleBank::new();
        let mut sensors = &bank;
        let config = ControlConfig {
            channels: &[Channel::VHigh, Channel::IHigh],
            ..ControlConfig::default()
        };
        let mut cycle = ControlCycle::<_, 1>::new(&config, FixedDuty::new(Leg::Leg1)).unwrap();
        let mut stage = RecordingStage::default();

        bank.publish(Channel::V1Low, 5.0);
        bank.publish(Channel::IHigh, 3.0);
        cycle.run(&Setpoints::default(), &mut sensors, &mut stage);

        assert_eq!(cycle.measurements().get(Channel::IHigh), 3.0);
        // 取得対象外のチャネルは更新されない
        assert_eq!(cycle.measurements().get(Channel::V1Low), 0.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ControlConfig {
            filter_time_constant_s: 0.0,
            ..ControlConfig::default()
        };
        assert!(matches!(
            ControlCycle::<_, 1>::new(&config, FixedDuty::new(Leg::Leg1)),
            Err(ConfigError::InvalidTimeConstant)
        ));
    }
}
