//! Phase accumulation and drift
//!
//! A phase accumulator adds `f / fs` every sample and wraps back into [0, 1).
//! How it wraps, and at what precision, decides whether the phase stays
//! locked to an ideal reference over long runs.

use std::fmt;
use std::str::FromStr;

use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::error::{DspLabError, Result};

/// Default number of plotted points for a drift run
pub const DEFAULT_TARGET_POINTS: usize = 2400;

/// How the accumulator brings the phase back into range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Never wrap; the phase grows without bound
    None,
    /// Subtract one when the phase reaches 1
    #[serde(rename = "sub1")]
    SubtractOne,
    /// Keep only the fractional part
    #[default]
    Fract,
}

impl WrapMode {
    pub fn id(&self) -> &'static str {
        match self {
            WrapMode::None => "none",
            WrapMode::SubtractOne => "sub1",
            WrapMode::Fract => "fract",
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for WrapMode {
    type Err = DspLabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(WrapMode::None),
            "sub1" | "subtract" | "conditional" => Ok(WrapMode::SubtractOne),
            "fract" | "floor" => Ok(WrapMode::Fract),
            _ => Err(DspLabError::invalid("wrap", &s, "none, sub1 or fract")),
        }
    }
}

/// Single conditional correction into [0, 1)
///
/// Only one cycle is removed, so an increment larger than one cycle leaves
/// the phase out of range.
#[inline]
pub fn wrap_conditional<T: Float>(p: T) -> T {
    let one = T::one();
    let mut p = p;
    if p >= one {
        p = p - one;
    }
    if p < T::zero() {
        p = p + one;
    }
    p
}

/// Fractional part, robust against jumps of several cycles
#[inline]
pub fn wrap_fract<T: Float>(p: T) -> T {
    p - p.floor()
}

/// Shortest signed distance on the unit circle, in cycles, within [-0.5, 0.5)
#[inline]
pub fn wrap_cycle_error(e: f64) -> f64 {
    e - (e + 0.5).floor()
}

// ============================================================================
// Accumulator
// ============================================================================

/// A period rounded to a whole number of samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExactPeriod {
    /// Never less than 2
    pub samples_per_period: u64,
    /// `sample_rate / samples_per_period`
    pub effective_frequency: f64,
}

impl ExactPeriod {
    /// Snap `frequency` to the nearest frequency whose period is a whole
    /// number of samples
    pub fn new(frequency: f64, sample_rate: f64) -> Result<Self> {
        if sample_rate <= 0.0 || !sample_rate.is_finite() {
            return Err(DspLabError::invalid("sample_rate", sample_rate, "> 0"));
        }
        if frequency <= 0.0 || !frequency.is_finite() {
            return Err(DspLabError::invalid("frequency", frequency, "> 0 Hz"));
        }

        let samples_per_period = ((sample_rate / frequency).round() as u64).max(2);
        Ok(Self {
            samples_per_period,
            effective_frequency: sample_rate / samples_per_period as f64,
        })
    }

    /// Phase increment per sample, `1 / samples_per_period`
    pub fn increment(&self) -> f64 {
        1.0 / self.samples_per_period as f64
    }
}

/// Running phase with a wrap counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAccumulator {
    phase: f64,
    increment: f64,
    mode: WrapMode,
    wraps: u64,
}

impl PhaseAccumulator {
    pub fn new(increment: f64, mode: WrapMode) -> Self {
        Self {
            phase: 0.0,
            increment,
            mode,
            wraps: 0,
        }
    }

    /// Accumulator for `frequency` Hz at `sample_rate`
    pub fn with_frequency(frequency: f64, sample_rate: f64, mode: WrapMode) -> Self {
        Self::new(frequency / sample_rate, mode)
    }

    /// Accumulator whose period is exactly a whole number of samples
    ///
    /// Returns the snapped period alongside, since the frequency that
    /// actually plays differs from the one asked for.
    pub fn with_exact_period(
        frequency: f64,
        sample_rate: f64,
        mode: WrapMode,
    ) -> Result<(Self, ExactPeriod)> {
        let period = ExactPeriod::new(frequency, sample_rate)?;
        Ok((Self::new(period.increment(), mode), period))
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }

    pub fn set_increment(&mut self, increment: f64) {
        self.increment = increment;
    }

    pub fn mode(&self) -> WrapMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: WrapMode) {
        self.mode = mode;
    }

    /// Wraps counted since the last reset
    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.wraps = 0;
    }

    /// Advance one sample
    ///
    /// Returns the new phase and whether it crossed the wrap boundary.
    /// `WrapMode::None` still reports crossings but never counts them.
    pub fn step(&mut self) -> (f64, bool) {
        let p = self.phase + self.increment;

        let (phase, wrapped) = match self.mode {
            WrapMode::None => (p, p >= 1.0),
            WrapMode::SubtractOne => {
                if p >= 1.0 {
                    (p - 1.0, true)
                } else {
                    (p, false)
                }
            }
            WrapMode::Fract => {
                let whole = p.floor();
                (p - whole, whole != 0.0 || p >= 1.0)
            }
        };

        self.phase = phase;
        if wrapped && self.mode != WrapMode::None {
            self.wraps += 1;
        }
        (phase, wrapped)
    }
}

// ============================================================================
// Drift simulation
// ============================================================================

/// Inputs for a drift run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftParams {
    pub sample_rate: f64,
    pub frequency: f64,
    pub duration_secs: f64,
    pub wrap: WrapMode,
    pub target_points: usize,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            frequency: 440.0,
            duration_secs: 60.0,
            wrap: WrapMode::Fract,
            target_points: DEFAULT_TARGET_POINTS,
        }
    }
}

impl DriftParams {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate <= 0.0 || !self.sample_rate.is_finite() {
            return Err(DspLabError::invalid("sample_rate", self.sample_rate, "> 0"));
        }
        if !self.frequency.is_finite() {
            return Err(DspLabError::invalid("frequency", self.frequency, "a finite number"));
        }
        if self.duration_secs < 0.0 || !self.duration_secs.is_finite() {
            return Err(DspLabError::invalid("duration", self.duration_secs, ">= 0 seconds"));
        }
        Ok(())
    }
}

/// One plotted sample of the drift curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriftPoint {
    pub time_secs: f64,
    pub error_degrees: f64,
}

/// Result of a drift run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftReport {
    pub points: Vec<DriftPoint>,
    /// Last sample index simulated
    pub steps: u64,
    pub stride: u64,
    pub max_abs_degrees: f64,
    pub final_degrees: f64,
}

fn wrap_with<T: Float>(mode: WrapMode, p: T) -> T {
    match mode {
        WrapMode::None => p,
        WrapMode::SubtractOne => wrap_conditional(p),
        WrapMode::Fract => wrap_fract(p),
    }
}

/// Compare an f32 phase accumulator against an f64 reference
///
/// Both advance by `frequency / sample_rate` and wrap the same way. The
/// error between them is sampled every `stride` steps (and always on the
/// last one), wrapped to half a cycle, and reported in degrees.
pub fn simulate_drift(params: &DriftParams) -> Result<DriftReport> {
    params.validate()?;

    let steps = ((params.duration_secs * params.sample_rate).floor() as u64).max(1);
    let stride = (steps / params.target_points.max(1) as u64).max(1);

    let inc_ref = params.frequency / params.sample_rate;
    let inc_f32 = inc_ref as f32;

    let mut p_ref = 0.0_f64;
    let mut p_f32 = 0.0_f32;

    let mut points = Vec::with_capacity((steps / stride) as usize + 2);
    let mut max_abs = 0.0_f64;

    for n in 0..=steps {
        p_ref = wrap_with(params.wrap, p_ref + inc_ref);
        p_f32 = wrap_with(params.wrap, p_f32 + inc_f32);

        if n % stride == 0 || n == steps {
            let error = wrap_cycle_error(p_f32 as f64 - p_ref);
            let degrees = error * 360.0;
            max_abs = max_abs.max(degrees.abs());
            points.push(DriftPoint {
                time_secs: n as f64 / params.sample_rate,
                error_degrees: degrees,
            });
        }
    }

    let final_degrees = points.last().map_or(0.0, |p| p.error_degrees);

    log::debug!(
        "drift: {} steps, stride {}, max {:.6} deg, final {:.6} deg",
        steps,
        stride,
        max_abs,
        final_degrees
    );

    Ok(DriftReport {
        points,
        steps,
        stride,
        max_abs_degrees: max_abs,
        final_degrees,
    })
}
