//! One-pole recursive filter
//!
//! y[n] = x[n] + a*y[n-1]. A positive coefficient smooths (lowpass), a
//! negative one alternates sign and emphasises high frequencies. The
//! recurrence is left un-normalized, so the DC gain is 1/(1-a).

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::Processor;
use crate::error::{DspLabError, Result};

/// Which side of the cutoff a one-pole keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnePoleMode {
    #[default]
    Lowpass,
    Highpass,
}

impl fmt::Display for OnePoleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnePoleMode::Lowpass => f.write_str("lowpass"),
            OnePoleMode::Highpass => f.write_str("highpass"),
        }
    }
}

impl FromStr for OnePoleMode {
    type Err = DspLabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowpass" | "lp" => Ok(OnePoleMode::Lowpass),
            "highpass" | "hp" => Ok(OnePoleMode::Highpass),
            _ => Err(DspLabError::invalid("mode", s, "lowpass or highpass")),
        }
    }
}

/// Feedback coefficient for a cutoff frequency
///
/// Uses the small-angle approximation a = 1 - 2*pi*fc/fs, clamped to [0, 1]
/// and negated for highpass.
pub fn one_pole_coefficient(cutoff_hz: f64, sample_rate: f64, mode: OnePoleMode) -> f64 {
    let raw = 1.0 - 2.0 * PI * cutoff_hz / sample_rate;
    let clamped = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };
    match mode {
        OnePoleMode::Lowpass => clamped,
        OnePoleMode::Highpass => -clamped,
    }
}

/// One-pole filter state
#[derive(Debug, Clone, Default)]
pub struct OnePole {
    a: f64,
    y: f64,
}

impl OnePole {
    /// Create a filter with a raw feedback coefficient
    ///
    /// Coefficients outside [-1, 1] are rejected: |a| > 1 diverges.
    pub fn new(a: f64) -> Result<Self> {
        let mut filter = Self::default();
        filter.set_coefficient(a)?;
        Ok(filter)
    }

    /// Create a filter from a cutoff frequency
    pub fn with_cutoff(cutoff_hz: f64, sample_rate: f64, mode: OnePoleMode) -> Self {
        Self {
            a: one_pole_coefficient(cutoff_hz, sample_rate, mode),
            y: 0.0,
        }
    }

    pub fn coefficient(&self) -> f64 {
        self.a
    }

    pub fn set_coefficient(&mut self, a: f64) -> Result<()> {
        if !a.is_finite() || a.abs() > 1.0 {
            return Err(DspLabError::invalid("a", a, "-1.0 to 1.0"));
        }
        self.a = a;
        Ok(())
    }

    pub fn tick(&mut self, input: f64) -> f64 {
        self.y = input + self.a * self.y;
        self.y
    }
}

impl Processor for OnePole {
    fn process_sample(&mut self, input: f32) -> f32 {
        self.tick(input as f64) as f32
    }

    fn reset(&mut self) {
        self.y = 0.0;
    }
}
