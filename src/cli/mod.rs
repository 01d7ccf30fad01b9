//! CLI Module
//!
//! Command-line front end: design filters, inspect their responses, run them
//! over WAV files, step an LFSR, measure phase drift, analyze WAV spectra and
//! render test signals.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::analysis::{FrequencyRange, WindowType};
use crate::filter::{FilterType, OnePoleMode};
use crate::synth::{FilteredNoise, Waveform, WrapMode};

/// DSP lab - filter design, analysis and test-signal rendering
#[derive(Parser, Debug)]
#[command(name = "dsplab-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON config file with default settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print a plain-text table instead of JSON
    #[arg(long, global = true)]
    pub table: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Biquad design parameters shared by several commands
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Filter type (lowpass, highpass, bandpass, bandpass_peak, notch,
    /// allpass, peak, low_shelf, high_shelf)
    #[arg(short = 't', long = "type", default_value = "lowpass")]
    pub filter_type: FilterType,

    /// Center/cutoff frequency in Hz
    #[arg(short, long, default_value_t = 1000.0)]
    pub frequency: f64,

    /// Quality factor
    #[arg(short, long, default_value_t = std::f64::consts::FRAC_1_SQRT_2)]
    pub q: f64,

    /// Gain in dB (peak and shelf types only)
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub gain: f64,

    /// Sample rate in Hz (defaults to the config value)
    #[arg(short = 'r', long)]
    pub sample_rate: Option<u32>,

    /// Clamp out-of-range parameters instead of rejecting them
    #[arg(long)]
    pub clamp: bool,
}

/// Output file settings for rendered audio
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Length in seconds
    #[arg(short, long, default_value_t = 1.0)]
    pub duration: f64,

    /// Sample rate in Hz (defaults to the config value)
    #[arg(short = 'r', long)]
    pub sample_rate: Option<u32>,

    /// Bit depth: 16, 24 or 32 (float)
    #[arg(short, long)]
    pub bit_depth: Option<u16>,
}

/// Phase drift run settings
#[derive(Args, Debug, Clone)]
pub struct DriftArgs {
    #[arg(short, long, default_value_t = 440.0)]
    pub frequency: f64,

    /// Simulated time in seconds
    #[arg(short, long, default_value_t = 60.0)]
    pub duration: f64,

    /// Wrap mode: none, sub1 or fract
    #[arg(short, long, default_value = "fract")]
    pub wrap: WrapMode,

    #[arg(short = 'r', long)]
    pub sample_rate: Option<u32>,

    /// Approximate number of reported points
    #[arg(short, long, default_value_t = 2400)]
    pub points: usize,

    /// Snap the frequency so one period is a whole number of samples
    #[arg(long)]
    pub exact: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print normalized biquad coefficients
    Coeffs {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Analytic magnitude and phase response
    Response {
        #[command(flatten)]
        filter: FilterArgs,

        /// Grid size; half as many points are reported
        #[arg(short, long)]
        points: Option<usize>,

        /// Lowest reported dB value
        #[arg(long, allow_negative_numbers = true)]
        floor: Option<f64>,
    },

    /// Impulse response, optionally with its DFT magnitude
    Impulse {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of samples
        #[arg(short, long)]
        length: Option<usize>,

        /// Also report the DFT magnitude (dB) of the response
        #[arg(long)]
        dft: bool,

        /// Use the one-pole recurrence y = x + a*y with this coefficient
        #[arg(long, allow_negative_numbers = true)]
        one_pole: Option<f64>,
    },

    /// Run a WAV file through a designed biquad
    Filter {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Bit depth: 16, 24 or 32 (float)
        #[arg(short, long)]
        bit_depth: Option<u16>,
    },

    /// Biquad from a hand-placed pole and zero (conjugates mirrored)
    Zplane {
        #[arg(long, default_value_t = 0.7, allow_negative_numbers = true)]
        pole_re: f64,

        #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
        pole_im: f64,

        #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
        zero_re: f64,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        zero_im: f64,

        /// Grid size for the magnitude response
        #[arg(short, long, default_value_t = 512)]
        points: usize,

        /// Lowest reported dB value
        #[arg(long, default_value_t = -48.0, allow_negative_numbers = true)]
        floor: f64,

        /// Report poles on or outside the unit circle instead of failing
        #[arg(long)]
        allow_unstable: bool,
    },

    /// Step a linear feedback shift register
    Lfsr {
        /// Register width in bits (3-32)
        #[arg(short, long, default_value_t = 15)]
        width: u32,

        /// Seed as 0x hex, binary digits or decimal
        #[arg(short, long, default_value = "0x7FFF")]
        seed: String,

        /// Number of steps to print
        #[arg(short = 'n', long, default_value_t = 16)]
        steps: usize,

        /// Also compute the sequence period
        #[arg(long)]
        period: bool,
    },

    /// Phase drift of a single-precision accumulator against f64
    Drift {
        #[command(flatten)]
        args: DriftArgs,
    },

    /// Windowed FFT spectrum of a WAV file
    Spectrum {
        /// Input WAV file
        input: PathBuf,

        #[arg(long)]
        fft_size: Option<usize>,

        /// Window: rectangular, hann, hamming or blackman
        #[arg(short, long)]
        window: Option<WindowType>,

        /// Smoothing between frames, in [0, 1)
        #[arg(short, long)]
        smoothing: Option<f32>,

        /// Frequency range to report: full, musical or sub
        #[arg(long, default_value = "full")]
        range: FrequencyRange,

        /// Number of strongest bins to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Render a test signal to WAV
    Render {
        #[command(subcommand)]
        signal: RenderSignal,
    },

    /// Show the effective configuration or write a default config file
    Config {
        /// Write the default configuration to this path
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RenderSignal {
    /// LFSR noise clocked at an audio rate
    Noise {
        #[command(flatten)]
        out: RenderArgs,

        #[arg(short, long, default_value_t = 15)]
        width: u32,

        #[arg(short, long, default_value = "0x7FFF")]
        seed: String,

        /// Shift clock in Hz
        #[arg(long, default_value_t = 440.0)]
        clock: f64,

        #[arg(short, long, default_value_t = 0.1)]
        amplitude: f32,
    },

    /// White noise through a one-pole filter
    FilteredNoise {
        #[command(flatten)]
        out: RenderArgs,

        #[arg(long, default_value_t = FilteredNoise::DEFAULT_CUTOFF)]
        cutoff: f64,

        /// lowpass or highpass
        #[arg(short, long, default_value = "lowpass")]
        mode: OnePoleMode,

        #[arg(short, long, default_value_t = FilteredNoise::DEFAULT_AMPLITUDE)]
        amplitude: f32,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Naive or PolyBLEP oscillator
    Osc {
        #[command(flatten)]
        out: RenderArgs,

        /// sine, square, saw or triangle
        #[arg(short, long, default_value = "saw")]
        waveform: Waveform,

        #[arg(short, long, default_value_t = 440.0)]
        frequency: f64,

        /// Apply PolyBLEP correction
        #[arg(long)]
        polyblep: bool,

        #[arg(short, long, default_value_t = 0.2)]
        gain: f32,
    },

    /// Pitch-swept sine kick
    Kick {
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Decay time in seconds
        #[arg(long, default_value_t = 0.5)]
        decay: f64,

        #[arg(short = 'r', long)]
        sample_rate: Option<u32>,

        #[arg(short, long)]
        bit_depth: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_coeffs() {
        let cli = Cli::try_parse_from([
            "dsplab-cli", "coeffs", "-t", "peak", "-f", "2000", "-g", "-6", "--table",
        ])
        .unwrap();
        assert!(cli.table);
        match cli.command {
            Some(Commands::Coeffs { filter }) => {
                assert_eq!(filter.filter_type, FilterType::Peak);
                assert_eq!(filter.frequency, 2000.0);
                assert_eq!(filter.gain, -6.0);
                assert!(filter.sample_rate.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_render_osc() {
        let cli = Cli::try_parse_from([
            "dsplab-cli", "render", "osc", "-o", "saw.wav", "-w", "square", "--polyblep",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Render {
                signal: RenderSignal::Osc { out, waveform, polyblep, .. },
            }) => {
                assert_eq!(out.output, PathBuf::from("saw.wav"));
                assert_eq!(waveform, Waveform::Square);
                assert!(polyblep);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_filter_file() {
        let cli = Cli::try_parse_from([
            "dsplab-cli", "filter", "hum.wav", "-o", "clean.wav", "-t", "notch", "-f", "60",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Filter { input, output, filter, bit_depth }) => {
                assert_eq!(input, PathBuf::from("hum.wav"));
                assert_eq!(output, PathBuf::from("clean.wav"));
                assert_eq!(filter.filter_type, FilterType::Notch);
                assert_eq!(filter.frequency, 60.0);
                assert!(bit_depth.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_drift_exact() {
        let cli = Cli::try_parse_from(["dsplab-cli", "drift", "-f", "1000", "--exact", "-w", "sub1"])
            .unwrap();
        match cli.command {
            Some(Commands::Drift { args }) => {
                assert!(args.exact);
                assert_eq!(args.wrap, WrapMode::SubtractOne);
                assert_eq!(args.points, 2400);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_filter_type_rejected() {
        assert!(Cli::try_parse_from(["dsplab-cli", "coeffs", "-t", "comb"]).is_err());
    }
}
