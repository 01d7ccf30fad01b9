//! CLI Command Implementations

use std::path::Path;

use log::{debug, info, warn};
use rustfft::num_complex::Complex64;
use serde::Serialize;

use crate::analysis::{
    bin_for_frequency, dft_magnitude_db, impulse_response, magnitude_response_db,
    magnitudes_db, one_pole_impulse_response, FrequencyRange, FrequencyResponse,
    SpectrumAnalyzer, WindowType,
};
use crate::config::LabConfig;
use crate::engine::{export_wav, import_wav, AudioBuffer, Source};
use crate::error::{DspLabError, Result};
use crate::filter::{
    filter_buffer, BiquadCoeffs, FilterParams, FilterType, OnePoleMode, PoleZeroPair, ZPoint,
};
use crate::synth::{
    format_state, parse_seed, simulate_drift, Antialiasing, DriftParams, FilteredNoise, Kick,
    ExactPeriod, Lfsr, LfsrNoise, Oscillator, Waveform, WhiteNoise,
};

use super::{DriftArgs, FilterArgs, RenderArgs};

/// Print a value as pretty JSON
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn complex_pair(c: &Complex64) -> [f64; 2] {
    [c.re, c.im]
}

/// Build and validate design parameters from CLI flags and config
fn filter_params(args: &FilterArgs, config: &LabConfig) -> Result<FilterParams> {
    let sample_rate = args.sample_rate.unwrap_or(config.sample_rate) as f64;
    let params = FilterParams::new(args.frequency, args.q, args.gain, sample_rate);

    if args.clamp {
        let clamped = params.clamped();
        if clamped != params {
            info!(
                "clamped parameters: {:.2} Hz, Q {:.3}, {:.2} dB",
                clamped.frequency, clamped.q, clamped.gain_db
            );
        }
        return Ok(clamped);
    }

    params.validate()?;
    Ok(params)
}

fn design(args: &FilterArgs, config: &LabConfig) -> Result<(FilterParams, BiquadCoeffs)> {
    let params = filter_params(args, config)?;
    let coeffs = BiquadCoeffs::design(args.filter_type, &params)?;
    Ok((params, coeffs))
}

// ============================================================================
// coeffs
// ============================================================================

#[derive(Serialize)]
struct CoeffsReport {
    filter_type: FilterType,
    params: FilterParams,
    coefficients: BiquadCoeffs,
    poles: Vec<[f64; 2]>,
    zeros: Vec<[f64; 2]>,
    stable: bool,
}

pub fn coeffs(args: &FilterArgs, config: &LabConfig, table: bool) -> Result<()> {
    let (params, coefficients) = design(args, config)?;

    if table {
        println!(
            "{} @ {:.2} Hz, Q {:.4}, {:.2} dB (fs {} Hz)",
            args.filter_type.display_name(),
            params.frequency,
            params.q,
            params.gain_db,
            params.sample_rate
        );
        println!("{:-<40}", "");
        println!("b0 = {:+.10}", coefficients.b0);
        println!("b1 = {:+.10}", coefficients.b1);
        println!("b2 = {:+.10}", coefficients.b2);
        println!("a1 = {:+.10}", coefficients.a1);
        println!("a2 = {:+.10}", coefficients.a2);
        return Ok(());
    }

    print_json(&CoeffsReport {
        filter_type: args.filter_type,
        params,
        coefficients,
        poles: coefficients.poles().iter().map(complex_pair).collect(),
        zeros: coefficients.zeros().iter().map(complex_pair).collect(),
        stable: coefficients.is_stable(),
    })
}

// ============================================================================
// response
// ============================================================================

pub fn response(
    args: &FilterArgs,
    points: Option<usize>,
    floor: Option<f64>,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let (params, coeffs) = design(args, config)?;
    let points = points.unwrap_or(config.response_points);
    let floor_db = floor.unwrap_or(config.floor_db);

    let response = FrequencyResponse::compute(&coeffs, points, params.sample_rate, floor_db);
    debug!("computed {} response points", response.points.len());

    if table {
        println!("{:>12} {:>10} {:>10}", "freq_hz", "mag_db", "phase_rad");
        for p in &response.points {
            println!(
                "{:>12.2} {:>10.3} {:>10.4}",
                p.frequency_hz, p.magnitude_db, p.phase_rad
            );
        }
        return Ok(());
    }

    print_json(&response)
}

// ============================================================================
// impulse
// ============================================================================

#[derive(Serialize)]
struct ImpulseReport {
    source: String,
    samples: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dft_db: Option<Vec<f64>>,
}

pub fn impulse(
    args: &FilterArgs,
    length: Option<usize>,
    dft: bool,
    one_pole: Option<f64>,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let length = length.unwrap_or(config.ir_length);

    let (source, samples) = match one_pole {
        Some(a) => {
            if a.abs() >= 1.0 {
                warn!("one-pole coefficient {} does not decay", a);
            }
            (format!("one-pole a={}", a), one_pole_impulse_response(a, length))
        }
        None => {
            let (_, coeffs) = design(args, config)?;
            (args.filter_type.to_string(), impulse_response(&coeffs, length))
        }
    };

    let dft_db = dft.then(|| dft_magnitude_db(&samples, config.dft_size, config.floor_db));

    if table {
        println!("{:>6} {:>14}", "n", "h[n]");
        for (n, h) in samples.iter().enumerate() {
            println!("{:>6} {:>14.8}", n, h);
        }
        if let Some(mags) = &dft_db {
            println!();
            println!("{:>6} {:>10}", "bin", "mag_db");
            for (k, db) in mags.iter().enumerate() {
                println!("{:>6} {:>10.3}", k, db);
            }
        }
        return Ok(());
    }

    print_json(&ImpulseReport {
        source,
        samples,
        dft_db,
    })
}

// ============================================================================
// zplane
// ============================================================================

#[derive(Serialize)]
struct ZPlaneReport {
    points: [ZPoint; 4],
    pole_radius: f64,
    stable: bool,
    coefficients: BiquadCoeffs,
    magnitude_db: Vec<f64>,
}

pub fn zplane(
    pole: Complex64,
    zero: Complex64,
    points: usize,
    floor_db: f64,
    allow_unstable: bool,
    table: bool,
) -> Result<()> {
    let pair = PoleZeroPair::new(pole, zero);

    let coefficients = if allow_unstable {
        if pair.is_unstable() {
            warn!("pole radius {:.4} >= 1, filter is unstable", pair.pole_radius());
        }
        pair.coefficients()
    } else {
        pair.stable_coefficients()?
    };

    let magnitude_db = magnitude_response_db(&coefficients, points, floor_db);

    if table {
        println!("pole   {:+.4} {:+.4}j  (|p| = {:.4})", pole.re, pole.im, pair.pole_radius());
        println!("zero   {:+.4} {:+.4}j", zero.re, zero.im);
        println!(
            "b = [1, {:+.6}, {:+.6}]  a = [1, {:+.6}, {:+.6}]",
            coefficients.b1, coefficients.b2, coefficients.a1, coefficients.a2
        );
        return Ok(());
    }

    print_json(&ZPlaneReport {
        points: pair.points(),
        pole_radius: pair.pole_radius(),
        stable: !pair.is_unstable(),
        coefficients,
        magnitude_db,
    })
}

// ============================================================================
// lfsr
// ============================================================================

#[derive(Serialize)]
struct LfsrStep {
    step: usize,
    binary: String,
    hex: String,
    decimal: String,
    bit: u8,
}

#[derive(Serialize)]
struct LfsrReport {
    width: u32,
    seed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<u64>,
    steps: Vec<LfsrStep>,
}

/// Longest state listing the lfsr command will print
pub const MAX_LFSR_STEPS: usize = 1 << 20;

pub fn lfsr(width: u32, seed: &str, steps: usize, period: bool, table: bool) -> Result<()> {
    if steps > MAX_LFSR_STEPS {
        return Err(DspLabError::invalid(
            "steps",
            steps,
            &format!("at most {}", MAX_LFSR_STEPS),
        ));
    }
    let seed = parse_seed(seed, width)?;
    let mut lfsr = Lfsr::new(width, seed);
    debug!("lfsr width {} seed {:#x}", lfsr.width(), lfsr.seed());

    let period = if period {
        let limit = 1u64 << lfsr.width();
        let found = lfsr.period(limit);
        if found.is_none() {
            warn!("no repeat within {} steps", limit);
        }
        found
    } else {
        None
    };

    let mut records = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        if step > 0 {
            lfsr.step();
        }
        let display = lfsr.format_state();
        records.push(LfsrStep {
            step,
            binary: display.binary,
            hex: display.hex,
            decimal: display.decimal,
            bit: lfsr.output_bit() as u8,
        });
    }

    if table {
        if let Some(p) = period {
            println!("period: {}", p);
        }
        println!("{:>6}  {:<32}  {:>10}  {}", "step", "binary", "hex", "bit");
        for r in &records {
            println!("{:>6}  {:<32}  {:>10}  {}", r.step, r.binary, r.hex, r.bit);
        }
        return Ok(());
    }

    print_json(&LfsrReport {
        width: lfsr.width(),
        seed: format_state(lfsr.seed(), lfsr.width()).hex,
        period,
        steps: records,
    })
}

// ============================================================================
// drift
// ============================================================================

pub fn drift(args: &DriftArgs, config: &LabConfig, table: bool) -> Result<()> {
    let sample_rate = args.sample_rate.unwrap_or(config.sample_rate) as f64;

    let frequency = if args.exact {
        let period = ExactPeriod::new(args.frequency, sample_rate)?;
        info!(
            "exact period: {} samples, {:.4} Hz",
            period.samples_per_period, period.effective_frequency
        );
        period.effective_frequency
    } else {
        args.frequency
    };

    let params = DriftParams {
        sample_rate,
        frequency,
        duration_secs: args.duration,
        wrap: args.wrap,
        target_points: args.points,
    };
    let report = simulate_drift(&params)?;

    if table {
        println!(
            "{} steps, stride {}, max |error| {:.6} deg, final {:.6} deg",
            report.steps, report.stride, report.max_abs_degrees, report.final_degrees
        );
        println!("{:>12} {:>14}", "time_s", "error_deg");
        for p in &report.points {
            println!("{:>12.4} {:>14.8}", p.time_secs, p.error_degrees);
        }
        return Ok(());
    }

    print_json(&report)
}

// ============================================================================
// spectrum
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SpectrumBin {
    pub frequency_hz: f64,
    pub magnitude_db: f32,
}

/// Strongest bins of the last analyzed frame
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumReport {
    pub sample_rate: u32,
    pub fft_size: usize,
    pub window: WindowType,
    pub frames: usize,
    pub range: FrequencyRange,
    pub peaks: Vec<SpectrumBin>,
}

#[derive(Debug, Clone)]
pub struct SpectrumOptions {
    pub fft_size: Option<usize>,
    pub window: Option<WindowType>,
    pub smoothing: Option<f32>,
    pub range: FrequencyRange,
    pub top: usize,
}

pub fn spectrum(
    input: &Path,
    options: SpectrumOptions,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let report = spectrum_report(input, &options, config)?;

    if table {
        println!("{:>12} {:>10}", "freq_hz", "mag_db");
        for p in &report.peaks {
            println!("{:>12.2} {:>10.2}", p.frequency_hz, p.magnitude_db);
        }
        return Ok(());
    }
    print_json(&report)
}

/// Analyze a WAV file frame by frame and rank the bins of the last frame
pub fn spectrum_report(
    input: &Path,
    options: &SpectrumOptions,
    config: &LabConfig,
) -> Result<SpectrumReport> {
    let buffer = import_wav(input)?;
    let mono = buffer.to_mono();

    let fft_size = options.fft_size.unwrap_or(config.fft_size);
    let window = options.window.unwrap_or(config.window);
    let smoothing = options.smoothing.unwrap_or(config.smoothing);

    let mut analyzer = SpectrumAnalyzer::new(fft_size, window, smoothing)?;

    // Hop one full frame at a time. A trailing partial frame is dropped; a
    // file shorter than one frame is analyzed once, zero-padded.
    let mut last = None;
    let mut frames = 0;
    for frame in mono.chunks_exact(fft_size) {
        last = Some(analyzer.analyze(frame));
        frames += 1;
    }
    let magnitudes = match last {
        Some(m) => m,
        None => {
            frames = 1;
            analyzer.analyze(&mono)
        }
    };
    if mono.len() > fft_size && mono.len() % fft_size > 0 {
        debug!("ignored {} trailing samples", mono.len() % fft_size);
    }
    info!("analyzed {} frame(s) of {} samples", frames, fft_size);

    let db = magnitudes_db(&magnitudes);
    let sample_rate = buffer.sample_rate as f64;
    let (min_hz, max_hz) = options.range.bounds();
    let bins = db.len();
    let lo = bin_for_frequency(min_hz, sample_rate, bins);
    let hi = bin_for_frequency(max_hz, sample_rate, bins);

    let mut peaks: Vec<SpectrumBin> = (lo..=hi.min(bins.saturating_sub(1)))
        .map(|k| SpectrumBin {
            frequency_hz: analyzer.bin_frequency(k, sample_rate),
            magnitude_db: db[k],
        })
        .collect();
    peaks.sort_by(|a, b| b.magnitude_db.total_cmp(&a.magnitude_db));
    peaks.truncate(options.top);

    Ok(SpectrumReport {
        sample_rate: buffer.sample_rate,
        fft_size,
        window,
        frames,
        range: options.range,
        peaks,
    })
}

// ============================================================================
// render
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub output: String,
    pub signal: String,
    pub samples: usize,
    pub sample_rate: u32,
    pub duration_secs: f64,
    /// `None` for an empty or silent buffer
    pub peak_db: Option<f32>,
    pub rms_db: Option<f32>,
}

impl RenderReport {
    pub fn new(buffer: &AudioBuffer, signal: String, output: &Path) -> Self {
        let finite = |db: f32| db.is_finite().then_some(db);
        Self {
            output: output.display().to_string(),
            signal,
            samples: buffer.len(),
            sample_rate: buffer.sample_rate,
            duration_secs: buffer.duration_secs(),
            peak_db: finite(buffer.peak_db()),
            rms_db: finite(buffer.rms_db()),
        }
    }
}

fn format_db(db: Option<f32>) -> String {
    match db {
        Some(v) => format!("{:.2} dB", v),
        None => "silent".to_string(),
    }
}

fn write_render(
    buffer: &AudioBuffer,
    signal: String,
    output: &Path,
    bit_depth: u16,
    table: bool,
) -> Result<()> {
    export_wav(buffer, output, bit_depth)?;
    let report = RenderReport::new(buffer, signal, output);

    if table {
        println!(
            "{}: {} ({} samples, peak {}, rms {})",
            report.signal,
            report.output,
            report.samples,
            format_db(report.peak_db),
            format_db(report.rms_db)
        );
        return Ok(());
    }
    print_json(&report)
}

fn render_source<S: Source>(
    mut source: S,
    signal: String,
    out: &RenderArgs,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let buffer = source.render(out.duration);
    let bit_depth = out.bit_depth.unwrap_or(config.bit_depth);
    write_render(&buffer, signal, &out.output, bit_depth, table)
}

pub fn render_noise(
    out: &RenderArgs,
    width: u32,
    seed: &str,
    clock: f64,
    amplitude: f32,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let sample_rate = out.sample_rate.unwrap_or(config.sample_rate);
    let lfsr = Lfsr::new(width, parse_seed(seed, width)?);
    let noise = LfsrNoise::new(lfsr, clock, amplitude, sample_rate);
    render_source(
        noise,
        format!("lfsr noise ({} bits, {} Hz clock)", lfsr.width(), clock),
        out,
        config,
        table,
    )
}

pub fn render_filtered_noise(
    out: &RenderArgs,
    cutoff: f64,
    mode: OnePoleMode,
    amplitude: f32,
    seed: Option<u64>,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let sample_rate = out.sample_rate.unwrap_or(config.sample_rate);
    let white = match seed {
        Some(s) => WhiteNoise::new(s, sample_rate),
        None => WhiteNoise::from_entropy(sample_rate),
    };
    let noise = FilteredNoise::new(white, cutoff, mode).with_amplitude(amplitude);
    debug!("one-pole coefficient {:.6}", noise.coefficient());
    render_source(
        noise,
        format!("{} noise @ {} Hz", mode, cutoff),
        out,
        config,
        table,
    )
}

pub fn render_osc(
    out: &RenderArgs,
    waveform: Waveform,
    frequency: f64,
    polyblep: bool,
    gain: f32,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let sample_rate = out.sample_rate.unwrap_or(config.sample_rate);
    let antialiasing = if polyblep {
        Antialiasing::PolyBlep
    } else {
        Antialiasing::Naive
    };
    let osc = Oscillator::new(waveform, frequency, sample_rate)
        .with_antialiasing(antialiasing)
        .with_gain(gain);
    render_source(
        osc,
        format!("{:?} {} @ {} Hz", antialiasing, waveform, frequency).to_lowercase(),
        out,
        config,
        table,
    )
}

pub fn render_kick(
    output: &Path,
    decay: f64,
    sample_rate: Option<u32>,
    bit_depth: Option<u16>,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let sample_rate = sample_rate.unwrap_or(config.sample_rate);
    let mut kick = Kick::new(decay, sample_rate)?;
    let buffer = kick.render_hit();
    write_render(
        &buffer,
        format!("kick ({} s decay)", decay),
        output,
        bit_depth.unwrap_or(config.bit_depth),
        table,
    )
}

// ============================================================================
// filter
// ============================================================================

/// Run a WAV file through a designed biquad
///
/// The filter is designed at the file's own sample rate; `--sample-rate`
/// is ignored here.
pub fn filter(
    input: &Path,
    output: &Path,
    args: &FilterArgs,
    bit_depth: Option<u16>,
    config: &LabConfig,
    table: bool,
) -> Result<()> {
    let mut buffer = import_wav(input)?;

    if let Some(rate) = args.sample_rate {
        if rate != buffer.sample_rate {
            warn!(
                "ignoring --sample-rate {}, {} is {} Hz",
                rate,
                input.display(),
                buffer.sample_rate
            );
        }
    }
    let args = FilterArgs {
        sample_rate: Some(buffer.sample_rate),
        ..args.clone()
    };
    let (params, coeffs) = design(&args, config)?;
    debug!("filter coefficients {:?}", coeffs);

    filter_buffer(&coeffs, &mut buffer);
    if !buffer.is_valid() {
        return Err(DspLabError::InvalidAudio {
            reason: "filter output contains NaN or infinite samples".to_string(),
            source: None,
        });
    }

    write_render(
        &buffer,
        format!(
            "{} @ {} Hz ({})",
            args.filter_type.id(),
            params.frequency,
            input.display()
        ),
        output,
        bit_depth.unwrap_or(config.bit_depth),
        table,
    )
}

// ============================================================================
// config
// ============================================================================

pub fn config(init: Option<&Path>, config: &LabConfig) -> Result<()> {
    match init {
        Some(path) => {
            LabConfig::default().save(path)?;
            println!("Config written: {}", path.display());
            Ok(())
        }
        None => print_json(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn lowpass_args() -> FilterArgs {
        FilterArgs {
            filter_type: FilterType::LowPass,
            frequency: 1000.0,
            q: 0.707,
            gain: 0.0,
            sample_rate: None,
            clamp: false,
        }
    }

    #[test]
    fn test_filter_params_use_config_rate() {
        let config = LabConfig {
            sample_rate: 44100,
            ..Default::default()
        };
        let params = filter_params(&lowpass_args(), &config).unwrap();
        assert_eq!(params.sample_rate, 44100.0);
    }

    #[test]
    fn test_filter_params_reject_or_clamp() {
        let mut args = lowpass_args();
        args.frequency = 30000.0;
        assert!(filter_params(&args, &LabConfig::default()).is_err());

        args.clamp = true;
        let params = filter_params(&args, &LabConfig::default()).unwrap();
        assert_eq!(params.frequency, 20000.0);
    }

    #[test]
    fn test_render_and_analyze_round_trip() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("osc.wav");
        let out = RenderArgs {
            output: output.clone(),
            duration: 0.1,
            sample_rate: None,
            bit_depth: Some(16),
        };
        let config = LabConfig::default();

        render_osc(&out, Waveform::Sine, 1000.0, false, 0.5, &config, true).unwrap();
        assert!(output.exists());

        let options = SpectrumOptions {
            fft_size: Some(1024),
            window: Some(WindowType::Hann),
            smoothing: Some(0.0),
            range: FrequencyRange::Full,
            top: 3,
        };
        spectrum(&output, options, &config, false).unwrap();
    }

    #[test]
    fn test_render_kick_rejects_short_decay() {
        let dir = tempdir().unwrap();
        let result = render_kick(
            &dir.path().join("kick.wav"),
            0.001,
            None,
            None,
            &LabConfig::default(),
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zplane_unstable_requires_flag() {
        let pole = Complex64::new(0.9, 0.9);
        let zero = Complex64::new(-1.0, 0.0);
        assert!(zplane(pole, zero, 64, -48.0, false, true).is_err());
        assert!(zplane(pole, zero, 64, -48.0, true, true).is_ok());
    }

    #[test]
    fn test_config_init_writes_file() {
        let dir = tempdir().unwrap();
        let path: PathBuf = dir.path().join("lab.json");
        config(Some(&path), &LabConfig::default()).unwrap();
        assert_eq!(LabConfig::load(&path).unwrap(), LabConfig::default());
    }
}
