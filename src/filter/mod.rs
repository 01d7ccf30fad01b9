//! Filter design
//!
//! Coefficient synthesis for biquads (cookbook shapes and hand-placed
//! pole/zero pairs) and one-pole filters, plus processors that run them.

mod biquad;
mod design;
mod one_pole;
mod zplane;

pub use biquad::{filter_buffer, Biquad};
pub use design::{BiquadCoeffs, FilterParams, FilterType, Intermediates};
pub use one_pole::{one_pole_coefficient, OnePole, OnePoleMode};
pub use zplane::{PointKind, PoleZeroPair, ZPoint};
