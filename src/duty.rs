//! Duty-cycle generation
//!
//! Maps the user setpoints (and, for the inverter, the phase reference) to one
//! normalised duty command per leg. Every command leaving this module is
//! clamped to [0, 1].

use core::f32::consts::{PI, TAU};

use crate::hal::{Leg, LegSet};
use crate::setpoints::Setpoints;

/// Phase shift of legs a, b, c (0°, 120°, 240° lag)
pub const PHASE_SHIFTS: [f32; 3] = [0.0, TAU / 3.0, 2.0 * TAU / 3.0];

/// Saturate a duty command to [0, 1]. NaN maps to 0.
pub fn clamp_duty(duty: f32) -> f32 {
    if duty.is_nan() {
        return 0.0;
    }
    duty.clamp(0.0, 1.0)
}

/// Sine of an angle in radians
///
/// Uses idsp::cossin() on a full-scale i32 phase, which is much cheaper than
/// libm::sinf on Cortex-M.
pub fn fast_sin(theta: f32) -> f32 {
    // [0, 2π) → [-π, π)
    let normalized_theta = if theta >= PI { theta - TAU } else { theta };

    // i32::MIN..i32::MAX spans -π..π
    const SCALE: f32 = 2147483648.0 / PI; // 2^31 / π
    let phase: i32 = (normalized_theta * SCALE) as i32;

    let (_cos, sin) = idsp::cossin(phase);

    const I32_TO_F32: f32 = 1.0 / 2147483648.0; // 1 / 2^31
    sin as f32 * I32_TO_F32
}

/// Law turning setpoints and phase into `N` per-leg duty commands
pub trait DutyLaw<const N: usize> {
    /// Leg driven by each output slot
    fn legs(&self) -> [Leg; N];

    /// Legs to start when entering power mode
    fn active_legs(&self) -> LegSet;

    /// Duty commands, each clamped to [0, 1]
    fn duties(&self, setpoints: &Setpoints, phase: f32) -> [f32; N];
}

/// Single-leg DC/DC conversion at a fixed, user-adjustable duty cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDuty {
    leg: Leg,
}

impl FixedDuty {
    pub const fn new(leg: Leg) -> Self {
        Self { leg }
    }
}

impl DutyLaw<1> for FixedDuty {
    fn legs(&self) -> [Leg; 1] {
        [self.leg]
    }

    fn active_legs(&self) -> LegSet {
        LegSet::One(self.leg)
    }

    fn duties(&self, setpoints: &Setpoints, _phase: f32) -> [f32; 1] {
        [clamp_duty(setpoints.duty)]
    }
}

/// Balanced three-phase sinusoidal modulation
///
/// `duty_x = offset + amplitude·sin(phase - shift_x)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreePhaseSine {
    legs: [Leg; 3],
}

impl ThreePhaseSine {
    pub const fn new() -> Self {
        Self { legs: Leg::ALL }
    }

    /// Unclamped reference of one leg
    pub fn reference(offset: f32, amplitude: f32, phase: f32, shift: f32) -> f32 {
        offset + amplitude * fast_sin(crate::phase::wrap_angle(phase - shift))
    }
}

impl Default for ThreePhaseSine {
    fn default() -> Self {
        Self::new()
    }
}

impl DutyLaw<3> for ThreePhaseSine {
    fn legs(&self) -> [Leg; 3] {
        self.legs
    }

    fn active_legs(&self) -> LegSet {
        LegSet::All
    }

    fn duties(&self, setpoints: &Setpoints, phase: f32) -> [f32; 3] {
        PHASE_SHIFTS.map(|shift| {
            clamp_duty(Self::reference(
                setpoints.offset,
                setpoints.amplitude,
                phase,
                shift,
            ))
        })
    }
}
