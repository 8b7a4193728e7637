//! Open-loop control core for the OwnVerter power board
//!
//! A fixed-period control cycle acquires measurements, low-pass filters one
//! channel, advances a phase reference and, in power mode, drives either a
//! single leg at a fixed duty cycle (DC/DC) or three legs with balanced
//! sinusoidal duty cycles (inverter).
#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod command;
pub mod config;
pub mod control;
pub mod duty;
pub mod filter;
pub mod hal;
pub mod measurement;
pub mod mode;
pub mod phase;
pub mod setpoints;
pub mod shared;
pub mod status;

pub use command::Command;
pub use config::{ConfigError, ControlConfig};
pub use control::{ControlCycle, CycleOutput};
pub use duty::{DutyLaw, FixedDuty, ThreePhaseSine};
pub use hal::{Leg, LegSet, PowerStage, Sensors};
pub use measurement::{Channel, SampleBank};
pub use mode::OperatingMode;
pub use setpoints::{Adjustments, Setpoints};
pub use shared::Shared;
pub use status::{LedPattern, StatusReport};
