//! Phase accumulator
//!
//! Forward-Euler integration of angular frequency into a phase angle wrapped to
//! [0, 2π). This is the timebase of the sinusoidal duty references.

use core::f32::consts::TAU;
use libm::fmodf;

/// Angular frequency [rad/s] for a frequency in Hz
pub fn angular_frequency(frequency_hz: f32) -> f32 {
    TAU * frequency_hz
}

/// Wrap any finite angle into [0, 2π)
pub fn wrap_angle(angle: f32) -> f32 {
    // fmodf keeps the sign of the dividend, fold negatives back up
    let mut wrapped = fmodf(angle, TAU);
    if wrapped < 0.0 {
        wrapped += TAU;
    }
    // -ε + 2π can round to exactly 2π in f32
    if wrapped >= TAU {
        wrapped = 0.0;
    }
    wrapped
}

/// Wrapped phase angle advanced once per control period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAccumulator {
    angle: f32,
}

impl PhaseAccumulator {
    pub const fn new() -> Self {
        Self { angle: 0.0 }
    }

    /// Current phase [rad], always in [0, 2π)
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance by `omega * period_s`
    ///
    /// # Arguments
    /// * `omega` - Angular frequency (rad/s), may be negative
    /// * `period_s` - Integration step (seconds)
    ///
    /// # Returns
    /// The new phase in [0, 2π). A non-finite increment leaves the phase as is.
    pub fn advance(&mut self, omega: f32, period_s: f32) -> f32 {
        let next = self.angle + omega * period_s;
        if next.is_finite() {
            self.angle = wrap_angle(next);
        }
        self.angle
    }

    /// Advance using a frequency in Hz
    pub fn advance_hz(&mut self, frequency_hz: f32, period_s: f32) -> f32 {
        self.advance(angular_frequency(frequency_hz), period_s)
    }
}

impl Default for PhaseAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    const T: f32 = 100e-6;

    fn in_range(angle: f32) -> bool {
        (0.0..TAU).contains(&angle)
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert!((wrap_angle(-1.0) - (TAU - 1.0)).abs() < 1e-5);
        assert!((wrap_angle(-5.0 * TAU - 0.5) - (TAU - 0.5)).abs() < 1e-4);
        assert!(in_range(wrap_angle(TAU)));
        assert!(in_range(wrap_angle(-f32::EPSILON)));
        assert!(in_range(wrap_angle(-1e-9)));
    }

    #[test]
    fn test_phase_stays_in_range_for_any_frequency() {
        let frequencies = [
            0.0, 1.0, 50.0, 333.3, 1000.0, 4999.0, 10_000.0, 123_456.0, -50.0, -10_000.0, -1e6,
        ];
        let periods = [T, 1e-3, 0.5, 37e-6];

        for &f in &frequencies {
            for &period in &periods {
                let mut phase = PhaseAccumulator::new();
                for _ in 0..5000 {
                    let angle = phase.advance_hz(f, period);
                    assert!(in_range(angle), "f={} T={} angle={}", f, period, angle);
                }
            }
        }
    }

    #[test]
    fn test_one_period_returns_to_start() {
        // 50Hz, 100µs → 200ステップで1周期
        let mut phase = PhaseAccumulator::new();
        for _ in 0..100 {
            phase.advance_hz(50.0, T);
        }
        assert!((phase.angle() - PI).abs() < 1e-3);
        for _ in 0..100 {
            phase.advance_hz(50.0, T);
        }
        let angle = phase.angle();
        assert!(angle < 1e-3 || TAU - angle < 1e-3, "angle={}", angle);
    }

    #[test]
    fn test_frequency_change_is_phase_continuous() {
        let mut phase = PhaseAccumulator::new();
        for _ in 0..37 {
            phase.advance_hz(50.0, T);
        }
        let before = phase.angle();
        let after = phase.advance_hz(60.0, T);
        assert!((after - before - angular_frequency(60.0) * T).abs() < 1e-5);
    }

    #[test]
    fn test_large_negative_step_wraps() {
        let mut phase = PhaseAccumulator::new();
        phase.advance(-7.0 * TAU - 0.25, 1.0);
        assert!((phase.angle() - (TAU - 0.25)).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_step_is_ignored() {
        let mut phase = PhaseAccumulator::new();
        phase.advance_hz(50.0, T);
        let angle = phase.angle();
        assert_eq!(phase.advance(f32::NAN, T), angle);
        assert_eq!(phase.advance(f32::INFINITY, T), angle);
    }
}
