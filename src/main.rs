//! DSP Lab CLI
//!
//! Command-line interface for the dsplab filter and signal toolkit.

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::debug;
use rustfft::num_complex::Complex64;

use dsplab::cli::commands::{self, SpectrumOptions};
use dsplab::cli::{Cli, Commands, RenderSignal};
use dsplab::config::LabConfig;
use dsplab::{DspLabError, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    debug!("dsplab v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(e: &DspLabError) {
    eprintln!("Error [{}]: {}", e.error_code(), e);
    for suggestion in e.recovery_suggestions() {
        eprintln!("  - {}", suggestion);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = LabConfig::load_or_default(cli.config.as_deref())?;
    let table = cli.table;

    let Some(command) = cli.command else {
        println!("dsplab v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for available commands");
        return Ok(());
    };

    match command {
        Commands::Coeffs { filter } => commands::coeffs(&filter, &config, table),
        Commands::Response {
            filter,
            points,
            floor,
        } => commands::response(&filter, points, floor, &config, table),
        Commands::Impulse {
            filter,
            length,
            dft,
            one_pole,
        } => commands::impulse(&filter, length, dft, one_pole, &config, table),
        Commands::Filter {
            input,
            output,
            filter,
            bit_depth,
        } => commands::filter(&input, &output, &filter, bit_depth, &config, table),
        Commands::Zplane {
            pole_re,
            pole_im,
            zero_re,
            zero_im,
            points,
            floor,
            allow_unstable,
        } => commands::zplane(
            Complex64::new(pole_re, pole_im),
            Complex64::new(zero_re, zero_im),
            points,
            floor,
            allow_unstable,
            table,
        ),
        Commands::Lfsr {
            width,
            seed,
            steps,
            period,
        } => commands::lfsr(width, &seed, steps, period, table),
        Commands::Drift { args } => commands::drift(&args, &config, table),
        Commands::Spectrum {
            input,
            fft_size,
            window,
            smoothing,
            range,
            top,
        } => commands::spectrum(
            &input,
            SpectrumOptions {
                fft_size,
                window,
                smoothing,
                range,
                top,
            },
            &config,
            table,
        ),
        Commands::Render { signal } => match signal {
            RenderSignal::Noise {
                out,
                width,
                seed,
                clock,
                amplitude,
            } => commands::render_noise(&out, width, &seed, clock, amplitude, &config, table),
            RenderSignal::FilteredNoise {
                out,
                cutoff,
                mode,
                amplitude,
                seed,
            } => commands::render_filtered_noise(&out, cutoff, mode, amplitude, seed, &config, table),
            RenderSignal::Osc {
                out,
                waveform,
                frequency,
                polyblep,
                gain,
            } => commands::render_osc(&out, waveform, frequency, polyblep, gain, &config, table),
            RenderSignal::Kick {
                output,
                decay,
                sample_rate,
                bit_depth,
            } => commands::render_kick(&output, decay, sample_rate, bit_depth, &config, table),
        },
        Commands::Config { init } => commands::config(init.as_deref(), &config),
    }
}
