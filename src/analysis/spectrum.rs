//! FFT spectrum analyzer
//!
//! Windowed FFT with exponential smoothing between frames, plus the axis
//! helpers needed to plot the result on a log or linear frequency scale.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{DspLabError, Result};

/// Fixed tick positions for log-scaled frequency axes
pub const LOG_FREQUENCY_TICKS: [f64; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0, 20000.0,
];

// ============================================================================
// Windows
// ============================================================================

/// Analysis window applied before the FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Rectangular,
    Hann,
    Hamming,
    #[default]
    Blackman,
}

impl WindowType {
    pub const ALL: [WindowType; 4] = [
        WindowType::Rectangular,
        WindowType::Hann,
        WindowType::Hamming,
        WindowType::Blackman,
    ];

    /// Window coefficient for sample `n` of `len`
    pub fn coefficient(&self, n: usize, len: usize) -> f32 {
        if len < 2 {
            return 1.0;
        }
        let x = 2.0 * PI * n as f32 / (len - 1) as f32;
        match self {
            WindowType::Rectangular => 1.0,
            WindowType::Hann => 0.5 * (1.0 - x.cos()),
            WindowType::Hamming => 0.54 - 0.46 * x.cos(),
            WindowType::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            WindowType::Rectangular => "rectangular",
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for WindowType {
    type Err = DspLabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rectangular" | "rect" | "none" => Ok(WindowType::Rectangular),
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            _ => Err(DspLabError::invalid(
                "window",
                &s,
                "rectangular, hann, hamming or blackman",
            )),
        }
    }
}

/// Multiply samples by a window in place
pub fn apply_window(samples: &mut [f32], window: WindowType) {
    let len = samples.len();
    for (n, sample) in samples.iter_mut().enumerate() {
        *sample *= window.coefficient(n, len);
    }
}

/// Convert unsigned 8-bit time-domain data to centered floats
pub fn bytes_to_centered(bytes: &[u8]) -> Vec<f32> {
    bytes.iter().map(|&v| (v as f32 - 128.0) / 128.0).collect()
}

// ============================================================================
// Analyzer
// ============================================================================

/// Windowed FFT with per-bin exponential smoothing
pub struct SpectrumAnalyzer {
    fft_size: usize,
    window: WindowType,
    smoothing: f32,
    fft: Arc<dyn Fft<f32>>,
    previous: Option<Vec<f32>>,
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("fft_size", &self.fft_size)
            .field("window", &self.window)
            .field("smoothing", &self.smoothing)
            .finish()
    }
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, window: WindowType, smoothing: f32) -> Result<Self> {
        if fft_size < 2 {
            return Err(DspLabError::invalid("fft_size", &fft_size, ">= 2"));
        }
        Self::check_smoothing(smoothing)?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        Ok(Self {
            fft_size,
            window,
            smoothing,
            fft,
            previous: None,
        })
    }

    fn check_smoothing(smoothing: f32) -> Result<()> {
        if !(0.0..1.0).contains(&smoothing) {
            return Err(DspLabError::invalid("smoothing", &smoothing, "[0, 1)"));
        }
        Ok(())
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of magnitude bins produced per frame
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    pub fn window(&self) -> WindowType {
        self.window
    }

    pub fn set_window(&mut self, window: WindowType) {
        self.window = window;
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn set_smoothing(&mut self, smoothing: f32) -> Result<()> {
        Self::check_smoothing(smoothing)?;
        self.smoothing = smoothing;
        Ok(())
    }

    /// Forget the previous frame so the next one is not smoothed
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Linear magnitudes of the first `fft_size / 2` bins
    ///
    /// Short input is zero-padded, long input truncated. The window always
    /// spans the full FFT length.
    pub fn analyze(&mut self, samples: &[f32]) -> Vec<f32> {
        let n = self.fft_size;
        let mut buffer: Vec<Complex<f32>> = (0..n)
            .map(|i| {
                let s = samples.get(i).copied().unwrap_or(0.0);
                Complex::new(s * self.window.coefficient(i, n), 0.0)
            })
            .collect();

        self.fft.process(&mut buffer);

        let mut magnitudes: Vec<f32> = buffer.iter().take(n / 2).map(|c| c.norm()).collect();

        if let Some(prev) = &self.previous {
            let s = self.smoothing;
            for (m, &p) in magnitudes.iter_mut().zip(prev) {
                *m = s * p + (1.0 - s) * *m;
            }
        }
        self.previous = Some(magnitudes.clone());

        magnitudes
    }

    /// Analyze unsigned 8-bit samples
    pub fn analyze_bytes(&mut self, bytes: &[u8]) -> Vec<f32> {
        self.analyze(&bytes_to_centered(bytes))
    }

    /// Frequency (Hz) at the centre of bin `index`
    pub fn bin_frequency(&self, index: usize, sample_rate: f64) -> f64 {
        index as f64 * sample_rate / self.fft_size as f64
    }
}

/// Convert linear magnitudes to dB with a small guard against log(0)
pub fn magnitudes_db(magnitudes: &[f32]) -> Vec<f32> {
    magnitudes
        .iter()
        .map(|&m| 20.0 * (m + 1e-10).log10())
        .collect()
}

// ============================================================================
// Axis helpers
// ============================================================================

/// Preset frequency windows for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyRange {
    #[default]
    Full,
    Musical,
    Sub,
}

impl FrequencyRange {
    /// (min, max) in Hz
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            FrequencyRange::Full => (20.0, 20000.0),
            FrequencyRange::Musical => (50.0, 5000.0),
            FrequencyRange::Sub => (20.0, 200.0),
        }
    }
}

impl FromStr for FrequencyRange {
    type Err = DspLabError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(FrequencyRange::Full),
            "musical" => Ok(FrequencyRange::Musical),
            "sub" => Ok(FrequencyRange::Sub),
            _ => Err(DspLabError::invalid("range", &s, "full, musical or sub")),
        }
    }
}

/// Round tick values for a linear axis, roughly six per range
pub fn linear_ticks(min: f64, max: f64) -> Vec<f64> {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Vec::new();
    }

    let raw_step = range / 6.0;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = (raw_step / magnitude).ceil() * magnitude;

    let first = (min / step).ceil() * step;
    let spans = ((max - first) / step).floor();
    if !first.is_finite() || !(0.0..=6.0).contains(&spans) {
        return Vec::new();
    }

    (0..=spans as usize)
        .map(|i| first + i as f64 * step)
        .collect()
}

/// Horizontal position of `freq` on a log axis of `width` units
pub fn log_frequency(freq: f64, width: f64, min: f64, max: f64) -> f64 {
    let log_min = min.log10();
    let log_max = max.log10();
    (freq.log10() - log_min) / (log_max - log_min) * width
}

/// Nearest bin index for `freq`, given `bins` spanning DC to Nyquist
pub fn bin_for_frequency(freq: f64, sample_rate: f64, bins: usize) -> usize {
    if bins == 0 || sample_rate <= 0.0 {
        return 0;
    }
    let index = (freq * 2.0 * bins as f64 / sample_rate).round();
    (index.max(0.0) as usize).min(bins - 1)
}
