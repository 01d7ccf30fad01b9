//! Filter and signal analysis
//!
//! - `response`: impulse response, DFT and analytic frequency response
//! - `spectrum`: windowed FFT analyzer and plotting helpers

pub mod response;
pub mod spectrum;

pub use response::{
    dft_magnitude_db, grid_lines, impulse_response, magnitude_at, magnitude_response_db,
    magnitude_to_db, one_pole_impulse_response, phase_response, FrequencyResponse, ResponsePoint,
};
pub use spectrum::{
    apply_window, bin_for_frequency, bytes_to_centered, linear_ticks, log_frequency,
    magnitudes_db, FrequencyRange, SpectrumAnalyzer, WindowType, LOG_FREQUENCY_TICKS,
};
