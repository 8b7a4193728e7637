//! Interfaces between the control core and the board drivers.
//!
//! The control cycle only talks to sensors and the power stage through these
//! traits, so the same core runs against the STM32 peripherals in firmware and
//! against scripted doubles in host tests.

use crate::measurement::Channel;

/// One switching half-bridge of the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Leg {
    Leg1,
    Leg2,
    Leg3,
}

impl Leg {
    pub const ALL: [Leg; 3] = [Leg::Leg1, Leg::Leg2, Leg::Leg3];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Target of a start/stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LegSet {
    One(Leg),
    All,
}

impl LegSet {
    pub fn contains(self, leg: Leg) -> bool {
        match self {
            LegSet::One(l) => l == leg,
            LegSet::All => true,
        }
    }
}

/// Source of converted measurements.
///
/// `latest` must not block. `None` means no conversion completed since the
/// previous query for that channel.
pub trait Sensors {
    fn latest(&mut self, channel: Channel) -> Option<f32>;
}

/// Switching power stage.
///
/// `start`/`stop` must tolerate being called in the state they request,
/// although the control cycle only issues them on mode edges.
pub trait PowerStage {
    fn start(&mut self, legs: LegSet);
    fn stop(&mut self, legs: LegSet);
    /// `duty` is a fraction of the switching period in [0, 1]
    fn set_duty_cycle(&mut self, leg: Leg, duty: f32);
}
