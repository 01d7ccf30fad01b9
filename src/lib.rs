//! DSP Lab - filter design and signal analysis toolkit
//!
//! Designs RBJ cookbook biquads and one-pole filters, computes their impulse
//! and frequency responses, and renders the small test signals used to teach
//! them (LFSR noise, naive and PolyBLEP oscillators, a swept kick).
//!
//! # Layout
//!
//! - [`filter`]: coefficient design, the biquad and one-pole processors,
//!   pole/zero placement
//! - [`analysis`]: impulse response, DFT and analytic response, FFT analyzer
//! - [`synth`]: signal generators
//! - [`engine`]: audio buffers, WAV I/O and the `Source`/`Processor` traits

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod synth;

pub use error::{DspLabError, Result};
