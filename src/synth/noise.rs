//! White and one-pole filtered noise

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{Processor, Source, DEFAULT_SAMPLE_RATE};
use crate::filter::{one_pole_coefficient, OnePole, OnePoleMode};

/// Uniform noise in [-1, 1)
#[derive(Debug, Clone)]
pub struct WhiteNoise {
    rng: StdRng,
    seed: u64,
    sample_rate: u32,
}

impl WhiteNoise {
    /// Reproducible noise from a fixed seed
    pub fn new(seed: u64, sample_rate: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            sample_rate,
        }
    }

    /// Noise seeded from the OS
    pub fn from_entropy(sample_rate: u32) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new(seed, sample_rate)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next value in f64 precision
    pub fn next_value(&mut self) -> f64 {
        self.rng.gen_range(-1.0..1.0)
    }
}

impl Default for WhiteNoise {
    fn default() -> Self {
        Self::new(0, DEFAULT_SAMPLE_RATE)
    }
}

impl Source for WhiteNoise {
    fn next_sample(&mut self) -> f32 {
        self.next_value() as f32
    }

    /// Restart the sequence from the original seed
    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// White noise through a one-pole lowpass or highpass
#[derive(Debug, Clone)]
pub struct FilteredNoise {
    noise: WhiteNoise,
    filter: OnePole,
    cutoff_hz: f64,
    mode: OnePoleMode,
    amplitude: f32,
}

impl FilteredNoise {
    pub const DEFAULT_AMPLITUDE: f32 = 0.5;
    pub const DEFAULT_CUTOFF: f64 = 1000.0;

    pub fn new(noise: WhiteNoise, cutoff_hz: f64, mode: OnePoleMode) -> Self {
        let filter = OnePole::with_cutoff(cutoff_hz, noise.sample_rate() as f64, mode);
        Self {
            noise,
            filter,
            cutoff_hz,
            mode,
            amplitude: Self::DEFAULT_AMPLITUDE,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn mode(&self) -> OnePoleMode {
        self.mode
    }

    /// Feedback coefficient currently in use
    pub fn coefficient(&self) -> f64 {
        self.filter.coefficient()
    }

    /// Retune without clearing the filter state
    pub fn set_cutoff(&mut self, cutoff_hz: f64, mode: OnePoleMode) {
        self.cutoff_hz = cutoff_hz;
        self.mode = mode;
        let sample_rate = self.noise.sample_rate() as f64;
        let a = one_pole_coefficient(cutoff_hz, sample_rate, mode);
        if let Err(e) = self.filter.set_coefficient(a) {
            log::warn!("keeping previous coefficient: {}", e);
        }
    }
}

impl Source for FilteredNoise {
    fn next_sample(&mut self) -> f32 {
        let x = self.noise.next_value();
        (self.filter.tick(x) as f32) * self.amplitude
    }

    fn reset(&mut self) {
        self.noise.reset();
        Processor::reset(&mut self.filter);
    }

    fn sample_rate(&self) -> u32 {
        self.noise.sample_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Mean squared first difference relative to signal power
    fn roughness(samples: &[f32]) -> f32 {
        let diff: f32 = samples.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        let power: f32 = samples.iter().map(|s| s * s).sum();
        diff / power
    }

    #[test]
    fn test_white_noise_range() {
        let mut noise = WhiteNoise::new(42, 48000);
        for _ in 0..10_000 {
            let s = noise.next_sample();
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_white_noise_is_reproducible() {
        let mut a = WhiteNoise::new(7, 48000);
        let mut b = WhiteNoise::new(7, 48000);
        let first: Vec<f32> = (0..16).map(|_| a.next_sample()).collect();
        let second: Vec<f32> = (0..16).map(|_| b.next_sample()).collect();
        assert_eq!(first, second);

        a.reset();
        assert_eq!(a.next_sample(), first[0]);
    }

    #[test]
    fn test_white_noise_mean_near_zero() {
        let buffer = WhiteNoise::new(1, 48000).render(1.0);
        let mean = buffer.channel(0).iter().sum::<f32>() / buffer.len() as f32;
        assert!(mean.abs() < 0.02, "mean {}", mean);
    }

    #[test]
    fn test_filtered_noise_coefficients() {
        let lp = FilteredNoise::new(WhiteNoise::default(), 1000.0, OnePoleMode::Lowpass);
        let hp = FilteredNoise::new(WhiteNoise::default(), 1000.0, OnePoleMode::Highpass);
        assert!(lp.coefficient() > 0.8);
        assert_relative_eq!(hp.coefficient(), -lp.coefficient());
    }

    #[test]
    fn test_lowpass_is_smoother_than_highpass() {
        let mut lp = FilteredNoise::new(WhiteNoise::new(3, 48000), 500.0, OnePoleMode::Lowpass);
        let mut hp = FilteredNoise::new(WhiteNoise::new(3, 48000), 500.0, OnePoleMode::Highpass);

        let lp_buf = lp.render(0.5);
        let hp_buf = hp.render(0.5);

        assert!(roughness(hp_buf.channel(0)) > roughness(lp_buf.channel(0)));
        assert!(lp_buf.is_valid() && hp_buf.is_valid());
    }

    #[test]
    fn test_amplitude_scales_output() {
        let mut quiet = FilteredNoise::new(WhiteNoise::new(9, 48000), 2000.0, OnePoleMode::Lowpass)
            .with_amplitude(0.1);
        let mut loud = FilteredNoise::new(WhiteNoise::new(9, 48000), 2000.0, OnePoleMode::Lowpass)
            .with_amplitude(1.0);
        for _ in 0..64 {
            assert_relative_eq!(quiet.next_sample() * 10.0, loud.next_sample(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_set_cutoff_switches_mode() {
        let mut noise = FilteredNoise::new(WhiteNoise::default(), 1000.0, OnePoleMode::Lowpass);
        noise.set_cutoff(1000.0, OnePoleMode::Highpass);
        assert!(noise.coefficient() < 0.0);
        assert_eq!(noise.mode(), OnePoleMode::Highpass);
    }
}
