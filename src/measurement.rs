//! Measurement acquisition
//!
//! Pulls the latest converted sample of every configured channel once per
//! control cycle and holds the last known value when a channel has nothing new.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::hal::Sensors;

/// Physical quantity measured on the power board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Leg 1 low-side voltage
    V1Low,
    /// Leg 2 low-side voltage
    V2Low,
    /// Leg 3 low-side voltage
    V3Low,
    /// Leg 1 low-side current
    I1Low,
    /// Leg 2 low-side current
    I2Low,
    /// Leg 3 low-side current
    I3Low,
    /// DC bus voltage
    VHigh,
    /// DC bus current
    IHigh,
}

impl Channel {
    pub const COUNT: usize = 8;

    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::V1Low,
        Channel::V2Low,
        Channel::V3Low,
        Channel::I1Low,
        Channel::I2Low,
        Channel::I3Low,
        Channel::VHigh,
        Channel::IHigh,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Last accepted value of every channel.
///
/// A value changes only when a genuine sample arrives; a "no new sample"
/// response leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    values: [f32; Channel::COUNT],
}

impl Measurements {
    pub const fn new() -> Self {
        Self {
            values: [0.0; Channel::COUNT],
        }
    }

    /// Store `sample` if there is one. Returns whether the channel was refreshed.
    pub fn update(&mut self, channel: Channel, sample: Option<f32>) -> bool {
        match sample {
            Some(value) => {
                self.values[channel.index()] = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, channel: Channel) -> f32 {
        self.values[channel.index()]
    }

    pub fn values(&self) -> [f32; Channel::COUNT] {
        self.values
    }
}

impl Default for Measurements {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear conversion from raw ADC counts to engineering units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcCalibration {
    /// Units per count
    pub gain: f32,
    /// Value at zero counts
    pub offset: f32,
}

impl AdcCalibration {
    pub const fn new(gain: f32, offset: f32) -> Self {
        Self { gain, offset }
    }

    pub fn convert(&self, raw: u16) -> f32 {
        raw as f32 * self.gain + self.offset
    }
}

/// Single-slot mailbox holding the most recent conversion of one channel.
///
/// The conversion side overwrites the slot; the control side takes it, so an
/// empty slot means nothing new arrived since the last cycle.
pub struct LatestSample {
    signal: Signal<CriticalSectionRawMutex, f32>,
}

impl LatestSample {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    pub fn publish(&self, value: f32) {
        self.signal.signal(value);
    }

    pub fn take(&self) -> Option<f32> {
        self.signal.try_take()
    }
}

impl Default for LatestSample {
    fn default() -> Self {
        Self::new()
    }
}

/// One [`LatestSample`] per [`Channel`], shared between the conversion task
/// and the control task
pub struct SampleBank {
    slots: [LatestSample; Channel::COUNT],
}

impl SampleBank {
    pub const fn new() -> Self {
        Self {
            slots: [const { LatestSample::new() }; Channel::COUNT],
        }
    }

    pub fn publish(&self, channel: Channel, value: f32) {
        self.slots[channel.index()].publish(value);
    }

    pub fn take(&self, channel: Channel) -> Option<f32> {
        self.slots[channel.index()].take()
    }
}

impl Default for SampleBank {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensors for &SampleBank {
    fn latest(&mut self, channel: Channel) -> Option<f32> {
        self.take(channel)
    }
}
