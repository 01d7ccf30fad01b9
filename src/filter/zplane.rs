//! Pole/zero placement on the z-plane
//!
//! One pole and one zero are placed by hand; their complex conjugates are
//! mirrored automatically so the resulting biquad has real coefficients:
//!
//! H(z) = (z - z0)(z - conj(z0)) / (z - p0)(z - conj(p0))

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{DspLabError, Result};

use super::design::BiquadCoeffs;

/// What a plotted point represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Pole,
    Zero,
}

/// A single point on the z-plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZPoint {
    pub re: f64,
    pub im: f64,
    pub kind: PointKind,
    /// False for the automatically mirrored conjugate
    pub primary: bool,
}

/// The hand-placed pole and zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoleZeroPair {
    pub pole: Complex64,
    pub zero: Complex64,
}

impl Default for PoleZeroPair {
    fn default() -> Self {
        Self {
            pole: Complex64::new(0.7, 0.5),
            zero: Complex64::new(-1.0, 0.0),
        }
    }
}

impl PoleZeroPair {
    pub fn new(pole: Complex64, zero: Complex64) -> Self {
        Self { pole, zero }
    }

    /// All four points: pole, conjugate pole, zero, conjugate zero
    pub fn points(&self) -> [ZPoint; 4] {
        let point = |c: Complex64, kind, primary| ZPoint {
            re: c.re,
            im: c.im,
            kind,
            primary,
        };
        [
            point(self.pole, PointKind::Pole, true),
            point(self.pole.conj(), PointKind::Pole, false),
            point(self.zero, PointKind::Zero, true),
            point(self.zero.conj(), PointKind::Zero, false),
        ]
    }

    /// Expand the conjugate pairs into biquad coefficients
    ///
    /// (z - c)(z - conj(c)) = z^2 - 2*Re(c)*z + |c|^2, so b0 = a0 = 1.
    pub fn coefficients(&self) -> BiquadCoeffs {
        BiquadCoeffs {
            b0: 1.0,
            b1: -2.0 * self.zero.re,
            b2: self.zero.norm_sqr(),
            a1: -2.0 * self.pole.re,
            a2: self.pole.norm_sqr(),
        }
    }

    pub fn pole_radius(&self) -> f64 {
        self.pole.norm()
    }

    /// A pole on or outside the unit circle makes the impulse response blow up
    pub fn is_unstable(&self) -> bool {
        self.pole_radius() >= 1.0
    }

    /// Coefficients, refusing unstable placements
    pub fn stable_coefficients(&self) -> Result<BiquadCoeffs> {
        if self.is_unstable() {
            log::warn!("pole {} is outside the unit circle", self.pole);
            return Err(DspLabError::UnstableFilter {
                magnitude: self.pole_radius(),
            });
        }
        Ok(self.coefficients())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_placement() {
        let pair = PoleZeroPair::default();
        let coeffs = pair.coefficients();
        assert_relative_eq!(coeffs.b1, 2.0, epsilon = 1e-12);
        assert_relative_eq!(coeffs.b2, 1.0, epsilon = 1e-12);
        assert_relative_eq!(coeffs.a1, -1.4, epsilon = 1e-12);
        assert_relative_eq!(coeffs.a2, 0.74, epsilon = 1e-12);
        assert!(!pair.is_unstable());
    }

    #[test]
    fn test_points_mirror_conjugates() {
        let points = PoleZeroPair::default().points();
        assert_eq!(points[0].im, 0.5);
        assert_eq!(points[1].im, -0.5);
        assert!(points[0].primary && !points[1].primary);
        assert_eq!(points[2].kind, PointKind::Zero);
        assert_eq!(points.iter().filter(|p| p.kind == PointKind::Pole).count(), 2);
    }

    #[test]
    fn test_coefficients_round_trip_through_roots() {
        let pair = PoleZeroPair::new(Complex64::new(0.3, 0.6), Complex64::new(0.5, 0.5));
        let coeffs = pair.coefficients();

        let poles = coeffs.poles();
        assert!(poles
            .iter()
            .any(|p| (p - pair.pole).norm() < 1e-9));
        assert!(poles
            .iter()
            .any(|p| (p - pair.pole.conj()).norm() < 1e-9));

        let zeros = coeffs.zeros();
        assert!(zeros.iter().any(|z| (z - pair.zero).norm() < 1e-9));
    }

    #[test]
    fn test_unit_circle_is_unstable() {
        let pair = PoleZeroPair::new(Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0));
        assert!(pair.is_unstable());
        assert!(!pair.coefficients().is_stable());

        let err = pair.stable_coefficients().unwrap_err();
        assert_eq!(err.error_code(), "UNSTABLE_FILTER");
    }
}
