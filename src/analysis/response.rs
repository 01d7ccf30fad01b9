//! Impulse and frequency response
//!
//! Two ways to get a magnitude curve: evaluate H(e^jw) analytically from the
//! coefficients, or run an impulse through the recurrence and take a DFT of
//! the (truncated) result. Both return `n/2` bins spaced evenly from DC up to,
//! but not including, Nyquist.

use std::f64::consts::PI;

use serde::Serialize;

use crate::filter::{Biquad, BiquadCoeffs};

/// Below this linear magnitude a bin is reported at the floor
const MAGNITUDE_EPSILON: f64 = 1e-10;

/// Most grid lines a single call will produce
pub const MAX_GRID_LINES: usize = 1024;

/// Convert a linear magnitude to dB, never going below `floor_db`
pub fn magnitude_to_db(linear: f64, floor_db: f64) -> f64 {
    if linear > MAGNITUDE_EPSILON {
        (20.0 * linear.log10()).max(floor_db)
    } else {
        floor_db
    }
}

/// Response of a biquad to a unit impulse at n = 0
pub fn impulse_response(coeffs: &BiquadCoeffs, n: usize) -> Vec<f64> {
    let mut biquad = Biquad::new(*coeffs);
    (0..n)
        .map(|i| biquad.tick(if i == 0 { 1.0 } else { 0.0 }))
        .collect()
}

/// Response of the one-pole recurrence y = x + a*y to a unit impulse
///
/// This is simply a^n, computed the same way the filter runs.
pub fn one_pole_impulse_response(a: f64, n: usize) -> Vec<f64> {
    let mut y = 0.0;
    (0..n)
        .map(|i| {
            let x = if i == 0 { 1.0 } else { 0.0 };
            y = x + a * y;
            y
        })
        .collect()
}

/// Magnitude spectrum (dB) of an impulse response via a direct DFT
///
/// The response is treated as zero-padded to `dft_size` points, so longer
/// DFTs give a smoother curve. Returns `dft_size / 2` bins.
pub fn dft_magnitude_db(ir: &[f64], dft_size: usize, floor_db: f64) -> Vec<f64> {
    if dft_size < 2 {
        return Vec::new();
    }

    let half = dft_size / 2;
    let len = ir.len().min(dft_size);

    (0..half)
        .map(|k| {
            let (re, im) = ir[..len]
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(re, im), (n, &x)| {
                    let angle = 2.0 * PI * (k * n) as f64 / dft_size as f64;
                    (re + x * angle.cos(), im - x * angle.sin())
                });
            magnitude_to_db((re * re + im * im).sqrt(), floor_db)
        })
        .collect()
}

/// Normalized angular frequency of bin `k` on an `n`-point grid
#[inline]
fn bin_omega(k: usize, half: usize) -> f64 {
    PI * k as f64 / half as f64
}

/// Analytic magnitude response (dB) on `n / 2` bins from DC towards Nyquist
pub fn magnitude_response_db(coeffs: &BiquadCoeffs, n: usize, floor_db: f64) -> Vec<f64> {
    let half = n / 2;
    (0..half)
        .map(|k| magnitude_to_db(coeffs.transfer_at(bin_omega(k, half)).norm(), floor_db))
        .collect()
}

/// Phase response (radians, in (-pi, pi]) on the same grid
pub fn phase_response(coeffs: &BiquadCoeffs, n: usize) -> Vec<f64> {
    let half = n / 2;
    (0..half)
        .map(|k| coeffs.transfer_at(bin_omega(k, half)).arg())
        .collect()
}

/// Linear magnitude at a single frequency in Hz
pub fn magnitude_at(coeffs: &BiquadCoeffs, frequency: f64, sample_rate: f64) -> f64 {
    coeffs
        .transfer_at(2.0 * PI * frequency / sample_rate)
        .norm()
}

/// dB values for horizontal grid lines, from `max_db` down to `min_db`
///
/// Empty when the bounds are not finite, the step is not positive, or the
/// range would need more than [`MAX_GRID_LINES`] lines.
pub fn grid_lines(min_db: f64, max_db: f64, step: f64) -> Vec<i64> {
    if step <= 0.0 || !step.is_finite() || !min_db.is_finite() || !max_db.is_finite() {
        return Vec::new();
    }
    if min_db > max_db {
        return Vec::new();
    }

    let spans = ((max_db - min_db) / step).floor();
    if !spans.is_finite() || spans >= MAX_GRID_LINES as f64 {
        log::warn!(
            "grid from {} to {} dB in {} dB steps needs too many lines",
            min_db,
            max_db,
            step
        );
        return Vec::new();
    }

    (0..=spans as usize)
        .map(|i| (max_db - i as f64 * step).round() as i64)
        .collect()
}

/// One point of a frequency response table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponsePoint {
    pub frequency_hz: f64,
    pub magnitude_db: f64,
    pub phase_rad: f64,
}

/// Full frequency response, ready to print or serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyResponse {
    pub sample_rate: f64,
    pub floor_db: f64,
    pub points: Vec<ResponsePoint>,
}

impl FrequencyResponse {
    /// Evaluate `n / 2` points from DC towards Nyquist
    pub fn compute(coeffs: &BiquadCoeffs, n: usize, sample_rate: f64, floor_db: f64) -> Self {
        let half = n / 2;
        let magnitudes = magnitude_response_db(coeffs, n, floor_db);
        let phases = phase_response(coeffs, n);

        let points = magnitudes
            .into_iter()
            .zip(phases)
            .enumerate()
            .map(|(k, (magnitude_db, phase_rad))| ResponsePoint {
                frequency_hz: k as f64 * sample_rate / 2.0 / half as f64,
                magnitude_db,
                phase_rad,
            })
            .collect();

        Self {
            sample_rate,
            floor_db,
            points,
        }
    }

    /// Point with the largest magnitude
    pub fn peak(&self) -> Option<&ResponsePoint> {
        self.points
            .iter()
            .max_by(|a, b| a.magnitude_db.total_cmp(&b.magnitude_db))
    }

    /// First frequency at which the magnitude drops below `threshold_db`
    pub fn first_below(&self, threshold_db: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.magnitude_db < threshold_db)
            .map(|p| p.frequency_hz)
    }
}
