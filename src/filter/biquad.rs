//! Biquad filter processor
//!
//! Runs a coefficient set over audio with the direct-form recurrence
//! y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2].

use crate::engine::{AudioBuffer, Processor};

use super::design::BiquadCoeffs;

/// Biquad filter with its own sample history
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    x1: f64, // x[n-1]
    x2: f64, // x[n-2]
    y1: f64, // y[n-1]
    y2: f64, // y[n-2]
}

impl Biquad {
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            ..Default::default()
        }
    }

    pub fn coefficients(&self) -> &BiquadCoeffs {
        &self.coeffs
    }

    /// Swap coefficients, keeping the history so parameter sweeps stay continuous
    pub fn set_coefficients(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Process a single sample at full precision
    pub fn tick(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        // Shift delay line
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

impl Processor for Biquad {
    fn process_sample(&mut self, input: f32) -> f32 {
        self.tick(input as f64) as f32
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Filter every channel of `buffer` in place, each with its own history
pub fn filter_buffer(coeffs: &BiquadCoeffs, buffer: &mut AudioBuffer) {
    for channel in buffer.samples.iter_mut() {
        let mut biquad = Biquad::new(*coeffs);
        biquad.process(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterParams, FilterType};
    use std::f64::consts::PI;

    /// Helper to create a sine block
    fn sine(frequency: f64, sample_rate: f64, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * frequency * i as f64 / sample_rate).sin() as f32)
            .collect()
    }

    /// Calculate RMS (linear)
    fn rms(samples: &[f32]) -> f64 {
        let sum_sq: f64 = samples.iter().map(|&s| (s as f64).powi(2)).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    fn lowpass(frequency: f64) -> Biquad {
        let params = FilterParams::new(frequency, 0.707, 0.0, 48000.0);
        Biquad::new(BiquadCoeffs::design(FilterType::LowPass, &params).unwrap())
    }

    #[test]
    fn test_identity_passes_through() {
        let mut biquad = Biquad::default();
        let mut block = sine(440.0, 48000.0, 256);
        let original = block.clone();
        biquad.process(&mut block);
        assert_eq!(block, original);
    }

    #[test]
    fn test_low_pass_filter() {
        let mut biquad = lowpass(1000.0);

        let mut low = sine(200.0, 48000.0, 4800);
        let rms_low_before = rms(&low);
        biquad.process(&mut low);
        let low_gain = rms(&low) / rms_low_before;

        biquad.reset();
        let mut high = sine(8000.0, 48000.0, 4800);
        let rms_high_before = rms(&high);
        biquad.process(&mut high);
        let high_gain = rms(&high) / rms_high_before;

        assert!(low_gain > 0.9 && low_gain < 1.1, "Low frequencies should pass, got {}", low_gain);
        assert!(high_gain < 0.05, "High frequencies should be attenuated, got {}", high_gain);
    }

    #[test]
    fn test_filter_buffer_keeps_channels_independent() {
        let coeffs = *lowpass(1000.0).coefficients();
        let silent = vec![0.0_f32; 480];
        let mut buffer = AudioBuffer {
            samples: vec![sine(8000.0, 48000.0, 480), silent.clone()],
            sample_rate: 48000,
        };

        filter_buffer(&coeffs, &mut buffer);

        assert_eq!(buffer.channel(1), silent.as_slice());
        assert!(rms(&buffer.channel(0)[240..]) < 0.05);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut biquad = lowpass(500.0);
        let mut block = vec![1.0_f32; 64];
        biquad.process(&mut block);

        biquad.reset();
        // first output after reset only sees the current input
        let first = biquad.process_sample(1.0);
        assert!((first as f64 - biquad.coefficients().b0).abs() < 1e-6);
    }

    #[test]
    fn test_set_coefficients_keeps_history() {
        let mut biquad = lowpass(500.0);
        let first = biquad.process_sample(1.0) as f64;
        biquad.set_coefficients(BiquadCoeffs::identity());
        assert_eq!(biquad.process_sample(0.25), 0.25);
        assert!((biquad.y2 - first).abs() < 1e-6);
        assert_eq!(biquad.x2, 1.0);
    }
}
