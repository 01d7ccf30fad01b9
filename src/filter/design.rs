//! Biquad coefficient design
//!
//! Closed-form coefficients for the nine classic second-order filter shapes,
//! following the Audio EQ Cookbook.
//! Reference: https://www.w3.org/2011/audio/audio-eq-cookbook.html
//!
//! Transfer function:
//! H(z) = (b0 + b1*z^-1 + b2*z^-2) / (a0 + a1*z^-1 + a2*z^-2)
//!
//! All coefficient sets leaving this module are normalized by a0.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{DspLabError, Result};

/// Below this magnitude a coefficient is treated as zero
const COEFF_EPSILON: f64 = 1e-12;

/// Second-order filter shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Passes frequencies below the cutoff
    #[default]
    #[serde(rename = "lowpass")]
    LowPass,
    /// Passes frequencies above the cutoff
    #[serde(rename = "highpass")]
    HighPass,
    /// Band-pass, constant skirt gain (peak gain = Q)
    #[serde(rename = "bandpass")]
    BandPass,
    /// Band-pass, constant 0 dB peak gain
    #[serde(rename = "bandpass_peak")]
    BandPassPeak,
    /// Band-reject around the cutoff
    #[serde(rename = "notch")]
    Notch,
    /// Unity magnitude, phase-only
    #[serde(rename = "allpass")]
    AllPass,
    /// Bell curve boost/cut
    #[serde(rename = "peak")]
    Peak,
    /// Boost/cut below frequency
    #[serde(rename = "low_shelf")]
    LowShelf,
    /// Boost/cut above frequency
    #[serde(rename = "high_shelf")]
    HighShelf,
}

impl FilterType {
    /// Every filter type, in menu order
    pub const ALL: [FilterType; 9] = [
        FilterType::LowPass,
        FilterType::HighPass,
        FilterType::BandPass,
        FilterType::BandPassPeak,
        FilterType::Notch,
        FilterType::AllPass,
        FilterType::Peak,
        FilterType::LowShelf,
        FilterType::HighShelf,
    ];

    /// Machine identifier, as used on the command line and in JSON
    pub fn id(&self) -> &'static str {
        match self {
            FilterType::LowPass => "lowpass",
            FilterType::HighPass => "highpass",
            FilterType::BandPass => "bandpass",
            FilterType::BandPassPeak => "bandpass_peak",
            FilterType::Notch => "notch",
            FilterType::AllPass => "allpass",
            FilterType::Peak => "peak",
            FilterType::LowShelf => "low_shelf",
            FilterType::HighShelf => "high_shelf",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterType::LowPass => "Lowpass",
            FilterType::HighPass => "Highpass",
            FilterType::BandPass => "Bandpass (constant skirt gain)",
            FilterType::BandPassPeak => "Bandpass (constant 0 dB peak)",
            FilterType::Notch => "Notch",
            FilterType::AllPass => "Allpass",
            FilterType::Peak => "Peak (Peaking EQ)",
            FilterType::LowShelf => "Low Shelf",
            FilterType::HighShelf => "High Shelf",
        }
    }

    /// One-paragraph explanation of what the shape does
    pub fn description(&self) -> &'static str {
        match self {
            FilterType::LowPass => {
                "Passes frequencies below the cutoff, attenuates above. Higher Q produces a \
                 resonant peak just before the cutoff."
            }
            FilterType::HighPass => {
                "Passes frequencies above the cutoff, attenuates below. Higher Q produces a \
                 resonant peak just above the cutoff."
            }
            FilterType::BandPass => {
                "Passes a band of frequencies around the cutoff. Peak amplitude scales with Q: \
                 higher Q means a taller, narrower peak."
            }
            FilterType::BandPassPeak => {
                "Passes a band of frequencies around the cutoff. Peak amplitude is always 0 dB \
                 regardless of Q; higher Q narrows the band without changing the peak height."
            }
            FilterType::Notch => {
                "Attenuates a narrow band of frequencies around the cutoff, passing everything \
                 else. Higher Q narrows the notch."
            }
            FilterType::AllPass => {
                "Passes all frequencies at equal amplitude. Only the phase is affected. Cutoff \
                 is where phase shift is exactly 180 degrees. Q controls the steepness of the \
                 phase transition."
            }
            FilterType::Peak => {
                "Boosts or cuts a band of frequencies centered at the cutoff. Q controls the \
                 width of the peak or notch. Gain sets the amount of boost or cut in dB."
            }
            FilterType::LowShelf => {
                "Boosts or cuts all frequencies below the cutoff by a fixed amount. The \
                 transition region is centered at the cutoff frequency."
            }
            FilterType::HighShelf => {
                "Boosts or cuts all frequencies above the cutoff by a fixed amount. The \
                 transition region is centered at the cutoff frequency."
            }
        }
    }

    /// Whether the gain parameter affects this shape
    pub fn uses_gain(&self) -> bool {
        matches!(
            self,
            FilterType::Peak | FilterType::LowShelf | FilterType::HighShelf
        )
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterType {
    type Err = DspLabError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let found = match normalized.as_str() {
            "lowpass" | "lpf" => Some(FilterType::LowPass),
            "highpass" | "hpf" => Some(FilterType::HighPass),
            "bandpass" | "bpf" => Some(FilterType::BandPass),
            "bandpass_peak" => Some(FilterType::BandPassPeak),
            "notch" => Some(FilterType::Notch),
            "allpass" => Some(FilterType::AllPass),
            "peak" | "peaking" => Some(FilterType::Peak),
            "low_shelf" | "lowshelf" => Some(FilterType::LowShelf),
            "high_shelf" | "highshelf" => Some(FilterType::HighShelf),
            _ => None,
        };

        found.ok_or_else(|| {
            DspLabError::invalid(
                "filter_type",
                s,
                "one of lowpass, highpass, bandpass, bandpass_peak, notch, allpass, peak, \
                 low_shelf, high_shelf",
            )
        })
    }
}

/// User-facing design parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Cutoff / centre frequency in Hz
    pub frequency: f64,
    /// Quality factor
    pub q: f64,
    /// Gain in dB (peak and shelf only)
    pub gain_db: f64,
    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            frequency: 1000.0,
            q: std::f64::consts::FRAC_1_SQRT_2,
            gain_db: 0.0,
            sample_rate: 48000.0,
        }
    }
}

impl FilterParams {
    /// Create a new parameter set
    pub fn new(frequency: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        Self {
            frequency,
            q,
            gain_db,
            sample_rate,
        }
    }

    /// Nyquist frequency for these parameters
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Check that the parameters describe a realizable filter
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(DspLabError::invalid("sample_rate", self.sample_rate, "> 0 Hz"));
        }

        if !self.frequency.is_finite() || self.frequency <= 0.0 || self.frequency >= self.nyquist()
        {
            return Err(DspLabError::invalid(
                "frequency",
                self.frequency,
                &format!("0 < f < {} Hz", self.nyquist()),
            ));
        }

        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(DspLabError::invalid("q", self.q, "> 0"));
        }

        if !self.gain_db.is_finite() {
            return Err(DspLabError::invalid("gain_db", self.gain_db, "a finite dB value"));
        }

        Ok(())
    }

    /// Clamp into the ranges offered by the interactive controls
    ///
    /// Frequency 20 Hz..20 kHz (and below Nyquist), Q 0.1..20, gain -24..+24 dB.
    pub fn clamped(&self) -> Self {
        let max_freq = 20000.0_f64.min(self.nyquist() - 1.0).max(20.0);
        Self {
            frequency: self.frequency.clamp(20.0, max_freq),
            q: self.q.clamp(0.1, 20.0),
            gain_db: self.gain_db.clamp(-24.0, 24.0),
            sample_rate: self.sample_rate,
        }
    }
}

/// Intermediate values shared by every cookbook formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Intermediates {
    /// Normalized angular frequency 2*pi*f/fs
    pub w0: f64,
    pub cos_w0: f64,
    pub sin_w0: f64,
    /// sin(w0) / (2*Q)
    pub alpha: f64,
    /// Amplitude 10^(gain/40)
    pub a: f64,
}

impl Intermediates {
    pub fn new(params: &FilterParams) -> Self {
        let w0 = 2.0 * PI * params.frequency / params.sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        Self {
            w0,
            cos_w0,
            sin_w0,
            alpha: sin_w0 / (2.0 * params.q),
            a: 10.0_f64.powf(params.gain_db / 40.0),
        }
    }
}

/// Normalized biquad coefficients (a0 divided out)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::identity()
    }
}

impl BiquadCoeffs {
    /// Pass-through coefficients
    pub const fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Normalize raw coefficients by a0
    pub fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Result<Self> {
        if [b0, b1, b2, a0, a1, a2].iter().any(|c| !c.is_finite()) {
            return Err(DspLabError::DegenerateCoefficients {
                reason: "coefficients must be finite".to_string(),
            });
        }

        if a0.abs() < COEFF_EPSILON {
            return Err(DspLabError::DegenerateCoefficients {
                reason: format!("a0 = {a0} cannot be normalized"),
            });
        }

        Ok(Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        })
    }

    /// Design a filter of the given shape
    ///
    /// Gain is ignored by shapes that don't use it.
    pub fn design(filter_type: FilterType, params: &FilterParams) -> Result<Self> {
        params.validate()?;

        let params = if filter_type.uses_gain() {
            *params
        } else {
            FilterParams {
                gain_db: 0.0,
                ..*params
            }
        };

        let Intermediates {
            cos_w0: c,
            sin_w0: s,
            alpha,
            a,
            ..
        } = Intermediates::new(&params);

        let (b0, b1, b2, a0, a1, a2) = match filter_type {
            FilterType::LowPass => (
                (1.0 - c) / 2.0,
                1.0 - c,
                (1.0 - c) / 2.0,
                1.0 + alpha,
                -2.0 * c,
                1.0 - alpha,
            ),
            FilterType::HighPass => (
                (1.0 + c) / 2.0,
                -(1.0 + c),
                (1.0 + c) / 2.0,
                1.0 + alpha,
                -2.0 * c,
                1.0 - alpha,
            ),
            FilterType::BandPass => (s / 2.0, 0.0, -s / 2.0, 1.0 + alpha, -2.0 * c, 1.0 - alpha),
            FilterType::BandPassPeak => (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * c, 1.0 - alpha),
            FilterType::Notch => (1.0, -2.0 * c, 1.0, 1.0 + alpha, -2.0 * c, 1.0 - alpha),
            FilterType::AllPass => (
                1.0 - alpha,
                -2.0 * c,
                1.0 + alpha,
                1.0 + alpha,
                -2.0 * c,
                1.0 - alpha,
            ),
            FilterType::Peak => (
                1.0 + alpha * a,
                -2.0 * c,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * c,
                1.0 - alpha / a,
            ),
            FilterType::LowShelf => {
                let tsa = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * c + tsa),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * c),
                    a * ((a + 1.0) - (a - 1.0) * c - tsa),
                    (a + 1.0) + (a - 1.0) * c + tsa,
                    -2.0 * ((a - 1.0) + (a + 1.0) * c),
                    (a + 1.0) + (a - 1.0) * c - tsa,
                )
            }
            FilterType::HighShelf => {
                let tsa = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * c + tsa),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * c),
                    a * ((a + 1.0) + (a - 1.0) * c - tsa),
                    (a + 1.0) - (a - 1.0) * c + tsa,
                    2.0 * ((a - 1.0) - (a + 1.0) * c),
                    (a + 1.0) - (a - 1.0) * c - tsa,
                )
            }
        };

        let coeffs = Self::from_raw(b0, b1, b2, a0, a1, a2)?;
        log::debug!(
            "designed {} at {:.1} Hz (Q {:.3}, {:.1} dB): {:?}",
            filter_type,
            params.frequency,
            params.q,
            params.gain_db,
            coeffs
        );
        Ok(coeffs)
    }

    /// Check if coefficients represent a bypass (unity gain, no filtering)
    pub fn is_identity(&self) -> bool {
        (self.b0 - 1.0).abs() < 1e-10
            && self.b1.abs() < 1e-10
            && self.b2.abs() < 1e-10
            && self.a1.abs() < 1e-10
            && self.a2.abs() < 1e-10
    }

    /// Evaluate H(e^jw) at a normalized angular frequency (radians/sample)
    pub fn transfer_at(&self, w: f64) -> Complex64 {
        let z1 = Complex64::from_polar(1.0, -w);
        let z2 = Complex64::from_polar(1.0, -2.0 * w);
        let num = self.b0 + z1 * self.b1 + z2 * self.b2;
        let den = 1.0 + z1 * self.a1 + z2 * self.a2;
        num / den
    }

    /// Roots of the denominator z^2 + a1*z + a2
    pub fn poles(&self) -> Vec<Complex64> {
        quadratic_roots(1.0, self.a1, self.a2)
    }

    /// Roots of the numerator b0*z^2 + b1*z + b2
    pub fn zeros(&self) -> Vec<Complex64> {
        quadratic_roots(self.b0, self.b1, self.b2)
    }

    /// Largest pole magnitude
    pub fn max_pole_radius(&self) -> f64 {
        self.poles().iter().map(|p| p.norm()).fold(0.0, f64::max)
    }

    /// A causal biquad is stable when every pole lies inside the unit circle
    pub fn is_stable(&self) -> bool {
        self.max_pole_radius() < 1.0
    }
}

/// Roots of a*z^2 + b*z + c, dropping roots at infinity when a vanishes
fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<Complex64> {
    if a.abs() < COEFF_EPSILON {
        if b.abs() < COEFF_EPSILON {
            return Vec::new();
        }
        return vec![Complex64::new(-c / b, 0.0)];
    }

    let disc = Complex64::new(b * b - 4.0 * a * c, 0.0).sqrt();
    vec![(-b + disc) / (2.0 * a), (-b - disc) / (2.0 * a)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn params(frequency: f64, q: f64, gain_db: f64) -> FilterParams {
        FilterParams::new(frequency, q, gain_db, 48000.0)
    }

    fn gain_db_at(coeffs: &BiquadCoeffs, frequency: f64) -> f64 {
        let w = 2.0 * PI * frequency / 48000.0;
        20.0 * coeffs.transfer_at(w).norm().log10()
    }

    #[test]
    fn test_lowpass_is_3db_down_at_cutoff() {
        let coeffs =
            BiquadCoeffs::design(FilterType::LowPass, &params(1000.0, 0.5_f64.sqrt(), 0.0))
                .unwrap();
        assert_relative_eq!(gain_db_at(&coeffs, 1000.0), -3.0103, epsilon = 1e-3);
        assert_relative_eq!(gain_db_at(&coeffs, 0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let coeffs =
            BiquadCoeffs::design(FilterType::HighPass, &params(1000.0, 0.707, 0.0)).unwrap();
        let dc = coeffs.transfer_at(0.0).norm();
        assert!(dc < 1e-9, "DC gain should vanish, got {}", dc);
        assert_relative_eq!(coeffs.transfer_at(PI).norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bandpass_peak_gain_equals_q() {
        let q = 4.0;
        let coeffs = BiquadCoeffs::design(FilterType::BandPass, &params(2000.0, q, 0.0)).unwrap();
        assert_relative_eq!(gain_db_at(&coeffs, 2000.0), 20.0 * q.log10(), epsilon = 1e-6);
    }

    #[test]
    fn test_bandpass_peak_is_0db_at_centre() {
        let coeffs =
            BiquadCoeffs::design(FilterType::BandPassPeak, &params(2000.0, 4.0, 0.0)).unwrap();
        assert_relative_eq!(gain_db_at(&coeffs, 2000.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_notch_nulls_centre() {
        let coeffs = BiquadCoeffs::design(FilterType::Notch, &params(60.0, 10.0, 0.0)).unwrap();
        let w = 2.0 * PI * 60.0 / 48000.0;
        assert!(coeffs.transfer_at(w).norm() < 1e-9);
    }

    #[test_case(100.0 ; "low")]
    #[test_case(1000.0 ; "centre")]
    #[test_case(15000.0 ; "high")]
    fn test_allpass_has_unit_magnitude(frequency: f64) {
        let coeffs = BiquadCoeffs::design(FilterType::AllPass, &params(1000.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(gain_db_at(&coeffs, frequency), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_allpass_phase_is_pi_at_cutoff() {
        let coeffs = BiquadCoeffs::design(FilterType::AllPass, &params(1000.0, 2.0, 0.0)).unwrap();
        let w = 2.0 * PI * 1000.0 / 48000.0;
        assert_relative_eq!(coeffs.transfer_at(w).arg().abs(), PI, epsilon = 1e-9);
    }

    #[test_case(12.0 ; "boost")]
    #[test_case(-9.0 ; "cut")]
    fn test_peak_gain_at_centre(gain_db: f64) {
        let coeffs = BiquadCoeffs::design(FilterType::Peak, &params(1000.0, 1.0, gain_db)).unwrap();
        assert_relative_eq!(gain_db_at(&coeffs, 1000.0), gain_db, epsilon = 1e-9);
    }

    #[test]
    fn test_low_shelf_gain_at_dc() {
        let coeffs =
            BiquadCoeffs::design(FilterType::LowShelf, &params(500.0, 0.707, 6.0)).unwrap();
        assert_relative_eq!(gain_db_at(&coeffs, 0.0), 6.0, epsilon = 1e-9);
        assert_relative_eq!(coeffs.transfer_at(PI).norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_high_shelf_gain_at_nyquist() {
        let coeffs =
            BiquadCoeffs::design(FilterType::HighShelf, &params(4000.0, 0.707, -6.0)).unwrap();
        assert_relative_eq!(
            20.0 * coeffs.transfer_at(PI).norm().log10(),
            -6.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(gain_db_at(&coeffs, 0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gain_ignored_for_lowpass() {
        let with_gain =
            BiquadCoeffs::design(FilterType::LowPass, &params(1000.0, 0.707, 12.0)).unwrap();
        let without =
            BiquadCoeffs::design(FilterType::LowPass, &params(1000.0, 0.707, 0.0)).unwrap();
        assert_eq!(with_gain, without);
    }

    #[test]
    fn test_peak_with_zero_gain_is_flat() {
        let coeffs = BiquadCoeffs::design(FilterType::Peak, &params(1000.0, 1.0, 0.0)).unwrap();
        // numerator and denominator cancel, even though the coefficients are not identity
        assert!(!coeffs.is_identity());
        for frequency in [50.0, 1000.0, 12000.0] {
            assert_relative_eq!(gain_db_at(&coeffs, frequency), 0.0, epsilon = 1e-9);
        }
        assert!(BiquadCoeffs::identity().is_identity());
    }

    #[test]
    fn test_from_raw_normalizes() {
        let coeffs = BiquadCoeffs::from_raw(2.0, 4.0, 6.0, 2.0, 1.0, 0.5).unwrap();
        assert_eq!(coeffs.b0, 1.0);
        assert_eq!(coeffs.b1, 2.0);
        assert_eq!(coeffs.b2, 3.0);
        assert_eq!(coeffs.a1, 0.5);
        assert_eq!(coeffs.a2, 0.25);
    }

    #[test]
    fn test_from_raw_rejects_zero_a0() {
        let err = BiquadCoeffs::from_raw(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_COEFFICIENTS");
    }

    #[test_case(0.0, 0.707, 48000.0 ; "zero frequency")]
    #[test_case(24000.0, 0.707, 48000.0 ; "at nyquist")]
    #[test_case(1000.0, 0.0, 48000.0 ; "zero q")]
    #[test_case(1000.0, 0.707, 0.0 ; "zero sample rate")]
    #[test_case(f64::NAN, 0.707, 48000.0 ; "nan frequency")]
    fn test_invalid_params_rejected(frequency: f64, q: f64, sample_rate: f64) {
        let params = FilterParams::new(frequency, q, 0.0, sample_rate);
        assert!(BiquadCoeffs::design(FilterType::LowPass, &params).is_err());
    }

    #[test]
    fn test_clamped_ranges() {
        let wild = FilterParams::new(50000.0, 100.0, -40.0, 48000.0).clamped();
        assert_eq!(wild.frequency, 20000.0);
        assert_eq!(wild.q, 20.0);
        assert_eq!(wild.gain_db, -24.0);

        let low_rate = FilterParams::new(30000.0, 0.01, 0.0, 22050.0).clamped();
        assert_eq!(low_rate.frequency, 11024.0);
        assert_eq!(low_rate.q, 0.1);
    }

    #[test]
    fn test_designed_filters_are_stable() {
        for filter_type in FilterType::ALL {
            let coeffs = BiquadCoeffs::design(filter_type, &params(1000.0, 5.0, 6.0)).unwrap();
            assert!(coeffs.is_stable(), "{} should be stable", filter_type);
            assert_eq!(coeffs.poles().len(), 2);
        }
    }

    #[test]
    fn test_notch_zeros_on_unit_circle() {
        let coeffs = BiquadCoeffs::design(FilterType::Notch, &params(1000.0, 2.0, 0.0)).unwrap();
        for zero in coeffs.zeros() {
            assert_relative_eq!(zero.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_quadratic_roots_degenerate() {
        assert!(quadratic_roots(0.0, 0.0, 1.0).is_empty());
        let linear = quadratic_roots(0.0, 2.0, -1.0);
        assert_eq!(linear, vec![Complex64::new(0.5, 0.0)]);
    }

    #[test]
    fn test_filter_type_round_trip() {
        for filter_type in FilterType::ALL {
            let parsed: FilterType = filter_type.id().parse().unwrap();
            assert_eq!(parsed, filter_type);

            let json = serde_json::to_string(&filter_type).unwrap();
            assert_eq!(json, format!("\"{}\"", filter_type.id()));
        }
        assert_eq!("High-Shelf".parse::<FilterType>().unwrap(), FilterType::HighShelf);
        assert!("comb".parse::<FilterType>().is_err());
    }

    #[test]
    fn test_uses_gain() {
        let gain_types: Vec<_> = FilterType::ALL
            .into_iter()
            .filter(FilterType::uses_gain)
            .collect();
        assert_eq!(
            gain_types,
            vec![FilterType::Peak, FilterType::LowShelf, FilterType::HighShelf]
        );
    }
}
