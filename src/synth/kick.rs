//! Synthesized kick drum
//!
//! A sine whose pitch falls exponentially from 120 Hz to 50 Hz, shaped by a
//! fast exponential attack and an exponential decay of adjustable length.

use std::f64::consts::PI;

use crate::engine::{AudioBuffer, Source, DEFAULT_SAMPLE_RATE};
use crate::error::{DspLabError, Result};

/// Silence before the hit
pub const ONSET_SECS: f64 = 0.01;
/// Length of the pitch sweep
pub const SWEEP_SECS: f64 = 0.2;
pub const START_HZ: f64 = 120.0;
pub const END_HZ: f64 = 50.0;
pub const ATTACK_SECS: f64 = 0.005;
/// Oscillator keeps running this long after the decay target
pub const TAIL_SECS: f64 = 0.05;
/// Exponential ramps cannot reach zero; this is the envelope floor
pub const ENVELOPE_FLOOR: f64 = 0.0001;

/// Exponential interpolation from `from` to `to` over `progress` in [0, 1]
#[inline]
fn exp_ramp(from: f64, to: f64, progress: f64) -> f64 {
    from * (to / from).powf(progress.clamp(0.0, 1.0))
}

/// One kick hit
#[derive(Debug, Clone)]
pub struct Kick {
    decay_secs: f64,
    sample_rate: u32,
    position: u64,
    phase: f64,
}

impl Kick {
    pub fn new(decay_secs: f64, sample_rate: u32) -> Result<Self> {
        if !decay_secs.is_finite() || decay_secs <= ATTACK_SECS {
            return Err(DspLabError::invalid(
                "decay",
                decay_secs,
                "longer than the 5 ms attack",
            ));
        }
        if sample_rate == 0 {
            return Err(DspLabError::invalid("sample_rate", sample_rate, "> 0"));
        }

        Ok(Self {
            decay_secs,
            sample_rate,
            position: 0,
            phase: 0.0,
        })
    }

    pub fn decay_secs(&self) -> f64 {
        self.decay_secs
    }

    /// Time from the start of the buffer until the oscillator stops
    pub fn total_duration(&self) -> f64 {
        ONSET_SECS + self.decay_secs + TAIL_SECS
    }

    /// Oscillator frequency at time `t` (seconds from the start of the buffer)
    pub fn frequency_at(&self, t: f64) -> f64 {
        exp_ramp(START_HZ, END_HZ, (t - ONSET_SECS) / SWEEP_SECS)
    }

    /// Amplitude envelope at time `t`; zero outside the sounding interval
    pub fn gain_at(&self, t: f64) -> f64 {
        let local = t - ONSET_SECS;
        if local < 0.0 || t >= self.total_duration() {
            return 0.0;
        }

        if local < ATTACK_SECS {
            exp_ramp(ENVELOPE_FLOOR, 1.0, local / ATTACK_SECS)
        } else {
            exp_ramp(
                1.0,
                ENVELOPE_FLOOR,
                (local - ATTACK_SECS) / (self.decay_secs - ATTACK_SECS),
            )
        }
    }

    /// Render the whole hit, tail included
    pub fn render_hit(&mut self) -> AudioBuffer {
        self.reset();
        let duration = self.total_duration();
        self.render(duration)
    }
}

impl Default for Kick {
    fn default() -> Self {
        Self {
            decay_secs: 0.5,
            sample_rate: DEFAULT_SAMPLE_RATE,
            position: 0,
            phase: 0.0,
        }
    }
}

impl Source for Kick {
    fn next_sample(&mut self) -> f32 {
        let fs = self.sample_rate as f64;
        let t = self.position as f64 / fs;
        self.position += 1;

        if t < ONSET_SECS {
            return 0.0;
        }

        let out = (2.0 * PI * self.phase).sin() * self.gain_at(t);
        self.phase += self.frequency_at(t) / fs;
        self.phase -= self.phase.floor();
        out as f32
    }

    fn reset(&mut self) {
        self.position = 0;
        self.phase = 0.0;
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
