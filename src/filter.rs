//! Single-pole low-pass filter
//!
//! `y[n] = α·y[n-1] + (1-α)·x[n]` with `α = exp(-T/τ)`, the exact
//! discretisation of a first-order lag with time constant τ sampled every T.

use libm::expm1f;

/// Filter construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterError {
    /// Sample period is not a positive finite number
    InvalidPeriod,
    /// Time constant is not a positive finite number
    InvalidTimeConstant,
}

/// First-order IIR low-pass filter
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    /// Input weight `1 - α`
    gain: f32,
    /// Previous output
    output: f32,
}

impl LowPassFilter {
    /// Create a filter for sample period `period_s` and time constant `time_constant_s`
    ///
    /// # Arguments
    /// * `period_s` - Sample period (seconds)
    /// * `time_constant_s` - Time constant τ (seconds)
    pub fn new(period_s: f32, time_constant_s: f32) -> Result<Self, FilterError> {
        if !(period_s.is_finite() && period_s > 0.0) {
            return Err(FilterError::InvalidPeriod);
        }
        if !(time_constant_s.is_finite() && time_constant_s > 0.0) {
            return Err(FilterError::InvalidTimeConstant);
        }

        // 1 - exp(-T/τ), kept accurate for T << τ
        let gain = -expm1f(-period_s / time_constant_s);

        Ok(Self { gain, output: 0.0 })
    }

    /// Feedback coefficient α
    pub fn alpha(&self) -> f32 {
        1.0 - self.gain
    }

    /// Feed one sample and return the new output
    pub fn update(&mut self, input: f32) -> f32 {
        // Same as α·y + (1-α)·x, but leaves y untouched when x == y
        self.output += self.gain * (input - self.output);
        self.output
    }

    pub fn output(&self) -> f32 {
        self.output
    }

    /// Overwrite the accumulator, e.g. with the first real sample after startup
    pub fn reset(&mut self, value: f32) {
        self.output = value;
    }
}
