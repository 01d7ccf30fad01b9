//! Naive and PolyBLEP oscillators
//!
//! The naive shapes are evaluated straight from the phase and alias badly at
//! high frequencies. PolyBLEP smooths each discontinuity of the saw and
//! square across two samples, which needs one sample of lookahead, so the
//! corrected output lags the phase by one sample.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{Source, DEFAULT_SAMPLE_RATE};
use crate::error::{DspLabError, Result};

/// Basic waveform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Saw,
        Waveform::Triangle,
    ];

    /// Naive value at `phase` in [0, 1)
    #[inline]
    pub fn shape(&self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 2.0 * (2.0 * phase - 1.0).abs(),
        }
    }

    /// Shapes with a jump discontinuity
    pub fn has_discontinuity(&self) -> bool {
        matches!(self, Waveform::Square | Waveform::Saw)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Saw => "saw",
            Waveform::Triangle => "triangle",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Waveform {
    type Err = DspLabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveform::Sine),
            "square" | "sqr" => Ok(Waveform::Square),
            "saw" | "sawtooth" => Ok(Waveform::Saw),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            _ => Err(DspLabError::invalid(
                "waveform",
                &s,
                "sine, square, saw or triangle",
            )),
        }
    }
}

/// Discontinuity handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Antialiasing {
    #[default]
    Naive,
    PolyBlep,
}

impl FromStr for Antialiasing {
    type Err = DspLabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "naive" | "none" => Ok(Antialiasing::Naive),
            "polyblep" | "poly_blep" | "blep" => Ok(Antialiasing::PolyBlep),
            _ => Err(DspLabError::invalid("antialiasing", &s, "naive or polyblep")),
        }
    }
}

/// Residual for the sample before a step that lands `d` samples before the
/// current one, per unit of step height
#[inline]
fn blep_before(d: f64) -> f64 {
    d * d / 2.0
}

/// Residual for the sample right after the step
#[inline]
fn blep_after(d: f64) -> f64 {
    (1.0 - d) * (1.0 - d) / 2.0
}

/// Audio-rate oscillator
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    antialiasing: Antialiasing,
    frequency: f64,
    gain: f32,
    sample_rate: u32,
    phase: f64,
    /// Held sample for the one-sample PolyBLEP delay
    pending: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: u32) -> Self {
        Self {
            waveform,
            antialiasing: Antialiasing::Naive,
            frequency,
            gain: 0.2,
            sample_rate,
            phase: 0.0,
            pending: 0.0,
        }
    }

    pub fn with_antialiasing(mut self, antialiasing: Antialiasing) -> Self {
        self.antialiasing = antialiasing;
        self
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.clamp(0.0, 1.0);
        self
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    pub fn antialiasing(&self) -> Antialiasing {
        self.antialiasing
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Output delay in samples
    pub fn latency(&self) -> usize {
        match self.antialiasing {
            Antialiasing::Naive => 0,
            Antialiasing::PolyBlep => 1,
        }
    }

    /// Spread a step of `height` over the held and current samples
    fn apply_step(&mut self, height: f64, d: f64, current: &mut f64) {
        self.pending += height * blep_before(d);
        *current -= height * blep_after(d);
    }

    fn tick(&mut self) -> f64 {
        let increment = if self.sample_rate > 0 {
            self.frequency / self.sample_rate as f64
        } else {
            0.0
        };

        let previous_phase = self.phase;
        let p = self.phase + increment;
        self.phase = p - p.floor();

        let mut current = self.waveform.shape(self.phase);

        if self.antialiasing == Antialiasing::Naive {
            return current;
        }

        if self.waveform.has_discontinuity() && increment > 0.0 {
            if previous_phase > self.phase {
                // saw drops by 2 at the wrap, square rises by 2
                let height = if self.waveform == Waveform::Saw { -2.0 } else { 2.0 };
                self.apply_step(height, self.phase / increment, &mut current);
            }

            if self.waveform == Waveform::Square && previous_phase < 0.5 && self.phase >= 0.5 {
                self.apply_step(-2.0, (self.phase - 0.5) / increment, &mut current);
            }
        }

        std::mem::replace(&mut self.pending, current)
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(Waveform::Sine, 440.0, DEFAULT_SAMPLE_RATE)
    }
}

impl Source for Oscillator {
    fn next_sample(&mut self) -> f32 {
        self.tick() as f32 * self.gain
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.pending = 0.0;
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
