//! Signal generators
//!
//! Everything here implements [`Source`](crate::engine::Source) and can be
//! rendered straight to a buffer or WAV file.

pub mod kick;
pub mod lfsr;
pub mod noise;
pub mod oscillator;
pub mod phase;

pub use kick::Kick;
pub use lfsr::{format_state, parse_seed, Lfsr, LfsrNoise, StateDisplay};
pub use noise::{FilteredNoise, WhiteNoise};
pub use oscillator::{Antialiasing, Oscillator, Waveform};
pub use phase::{
    simulate_drift, wrap_conditional, wrap_cycle_error, wrap_fract, DriftParams, DriftPoint,
    DriftReport, ExactPeriod, PhaseAccumulator, WrapMode,
};
