//! Linear feedback shift register noise
//!
//! Each step XORs bits 0 and 1, shifts right, and feeds the result into the
//! top bit. At 15 bits this gives the classic 32767-step sequence used by
//! early sound chips.

use crate::engine::{Source, DEFAULT_SAMPLE_RATE};
use crate::error::{DspLabError, Result};

pub const MIN_WIDTH: u32 = 3;
pub const MAX_WIDTH: u32 = 32;
pub const DEFAULT_WIDTH: u32 = 15;
pub const DEFAULT_SEED: u32 = 0x7FFF;

/// Bit mask covering the low `width` bits
#[inline]
pub fn width_mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Shift register state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lfsr {
    width: u32,
    state: u32,
    seed: u32,
    mask: u32,
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_SEED)
    }
}

impl Lfsr {
    /// Width is clamped to 3..=32. A seed that masks to zero becomes 1.
    pub fn new(width: u32, seed: u32) -> Self {
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        let mask = width_mask(width);
        let seed = match seed & mask {
            0 => 1,
            s => s,
        };
        Self {
            width,
            state: seed,
            seed,
            mask,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Change the register width
    ///
    /// The current state is masked to the new width and becomes the seed
    /// (or 1 if nothing survives the mask).
    pub fn set_width(&mut self, width: u32) {
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        if width == self.width {
            return;
        }

        self.width = width;
        self.mask = width_mask(width);
        self.state &= self.mask;
        self.seed = if self.state == 0 { 1 } else { self.state };
    }

    /// Replace the seed and restart from it
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = match seed & self.mask {
            0 => 1,
            s => s,
        };
        self.state = self.seed;
    }

    /// Return to the seed
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    /// The all-zero state feeds back zeros forever
    pub fn is_terminal(&self) -> bool {
        self.state == 0
    }

    /// Advance one step and return the new state
    pub fn step(&mut self) -> u32 {
        if self.is_terminal() {
            self.reset();
        }

        let feedback = (self.state & 1) ^ ((self.state >> 1) & 1);
        self.state = ((self.state >> 1) | (feedback << (self.width - 1))) & self.mask;
        self.state
    }

    /// The bit shifted out next
    pub fn output_bit(&self) -> bool {
        self.state & 1 == 1
    }

    /// Steps until the current state comes around again
    ///
    /// Returns `None` if the cycle is longer than `max_steps`.
    pub fn period(&self, max_steps: u64) -> Option<u64> {
        let mut probe = *self;
        if probe.is_terminal() {
            probe.reset();
        }
        let start = probe.state;

        for n in 1..=max_steps {
            if probe.step() == start {
                return Some(n);
            }
        }
        None
    }

    /// Binary, hex and decimal renderings of the current state
    pub fn format_state(&self) -> StateDisplay {
        format_state(self.state, self.width)
    }
}

/// A state rendered three ways
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDisplay {
    pub binary: String,
    pub hex: String,
    pub decimal: String,
}

/// Render `state` padded to `width` bits
pub fn format_state(state: u32, width: u32) -> StateDisplay {
    let width = width.clamp(MIN_WIDTH, MAX_WIDTH) as usize;
    let hex_digits = width.div_ceil(4);
    StateDisplay {
        binary: format!("{:0width$b}", state, width = width),
        hex: format!("0x{:0digits$X}", state, digits = hex_digits),
        decimal: state.to_string(),
    }
}

/// Parse a seed typed by a user
///
/// Accepts `0x`-prefixed hex, a string of only 0s and 1s (read as binary),
/// or decimal. The result is masked to `width` bits.
pub fn parse_seed(text: &str, width: u32) -> Result<u32> {
    let s = text.trim().to_lowercase();
    let expected = "0x-prefixed hex, binary digits or a decimal number";

    let parsed = if let Some(hex) = s.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if !s.is_empty() && s.chars().all(|c| c == '0' || c == '1') {
        u64::from_str_radix(&s, 2)
    } else {
        s.parse::<u64>()
    };

    let value = parsed.map_err(|_| DspLabError::invalid("seed", text, expected))?;
    Ok((value & width_mask(width.clamp(MIN_WIDTH, MAX_WIDTH)) as u64) as u32)
}

// ============================================================================
// Audio-rate noise
// ============================================================================

/// Square-ish noise from an LFSR clocked at `clock_hz`
#[derive(Debug, Clone)]
pub struct LfsrNoise {
    lfsr: Lfsr,
    clock_hz: f64,
    amplitude: f32,
    phase: f64,
    sample_rate: u32,
}

impl Default for LfsrNoise {
    fn default() -> Self {
        Self::new(Lfsr::default(), 440.0, 0.1, DEFAULT_SAMPLE_RATE)
    }
}

impl LfsrNoise {
    pub fn new(lfsr: Lfsr, clock_hz: f64, amplitude: f32, sample_rate: u32) -> Self {
        Self {
            lfsr,
            clock_hz,
            amplitude: amplitude.clamp(0.0, 1.0),
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn lfsr(&self) -> &Lfsr {
        &self.lfsr
    }

    pub fn lfsr_mut(&mut self) -> &mut Lfsr {
        &mut self.lfsr
    }

    pub fn set_clock(&mut self, clock_hz: f64) {
        self.clock_hz = clock_hz;
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }
}

impl Source for LfsrNoise {
    fn next_sample(&mut self) -> f32 {
        let fs = self.sample_rate as f64;
        if fs > 0.0 {
            self.phase += self.clock_hz.clamp(0.0, fs) / fs;
        }

        while self.phase >= 1.0 {
            self.phase -= 1.0;
            self.lfsr.step();
        }

        let level = if self.lfsr.output_bit() { 1.0 } else { -1.0 };
        level * self.amplitude
    }

    fn reset(&mut self) {
        self.lfsr.reset();
        self.phase = 0.0;
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_first_steps_from_default_seed() {
        let mut lfsr = Lfsr::default();
        let states: Vec<u32> = (0..3).map(|_| lfsr.step()).collect();
        assert_eq!(states, vec![0x3FFF, 0x1FFF, 0x0FFF]);
    }

    #[test_case(3, 7)]
    #[test_case(4, 15)]
    #[test_case(7, 127)]
    #[test_case(8, 63)]
    #[test_case(15, 32767)]
    fn test_period(width: u32, expected: u64) {
        let lfsr = Lfsr::new(width, 1);
        assert_eq!(lfsr.period(1 << 20), Some(expected));
    }

    #[test]
    fn test_period_limit() {
        assert_eq!(Lfsr::new(15, 1).period(100), None);
    }

    #[test]
    fn test_width_clamped() {
        assert_eq!(Lfsr::new(1, 1).width(), 3);
        assert_eq!(Lfsr::new(64, 1).width(), 32);
        assert_eq!(Lfsr::new(32, 1).mask(), u32::MAX);
    }

    #[test]
    fn test_zero_seed_becomes_one() {
        assert_eq!(Lfsr::new(8, 0).seed(), 1);
        assert_eq!(Lfsr::new(4, 0x10).seed(), 1);
    }

    #[test]
    fn test_set_width_reseeds_from_masked_state() {
        let mut lfsr = Lfsr::new(15, 0x7FFF);
        lfsr.set_width(8);
        assert_eq!(lfsr.state(), 0xFF);
        assert_eq!(lfsr.seed(), 0xFF);

        let mut lfsr = Lfsr::new(15, 0x4000);
        lfsr.set_width(4);
        assert_eq!(lfsr.state(), 0);
        assert_eq!(lfsr.seed(), 1);
        // terminal state recovers through the seed
        assert!(lfsr.is_terminal());
        lfsr.step();
        assert!(!lfsr.is_terminal());
    }

    #[test]
    fn test_state_stays_within_mask() {
        let mut lfsr = Lfsr::new(32, 0xDEAD_BEEF);
        for _ in 0..1000 {
            lfsr.step();
        }
        let mut lfsr = Lfsr::new(5, 0b10101);
        for _ in 0..100 {
            assert!(lfsr.step() <= 0b11111);
        }
    }

    #[test]
    fn test_parse_seed_formats() {
        assert_eq!(parse_seed("0x7FFF", 15).unwrap(), 0x7FFF);
        assert_eq!(parse_seed("  0Xff ", 15).unwrap(), 0xFF);
        assert_eq!(parse_seed("101", 15).unwrap(), 5);
        assert_eq!(parse_seed("123", 15).unwrap(), 123);
        assert_eq!(parse_seed("0xFFFFF", 15).unwrap(), 0x7FFF);
    }

    #[test]
    fn test_parse_seed_rejects_garbage() {
        let err = parse_seed("seed", 15).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(parse_seed("", 15).is_err());
        assert!(parse_seed("0x", 15).is_err());
    }

    #[test]
    fn test_format_state() {
        let display = format_state(0x0FFF, 15);
        assert_eq!(display.binary, "000111111111111");
        assert_eq!(display.hex, "0x0FFF");
        assert_eq!(display.decimal, "4095");
    }

    #[test]
    fn test_noise_levels_and_clock() {
        let mut noise = LfsrNoise::new(Lfsr::default(), 24000.0, 0.5, 48000);
        let samples: Vec<f32> = (0..8).map(|_| noise.next_sample()).collect();
        assert!(samples.iter().all(|s| s.abs() == 0.5));

        // clock at half the sample rate steps on every other sample
        noise.reset();
        noise.next_sample();
        assert_eq!(noise.lfsr().state(), 0x7FFF);
        noise.next_sample();
        assert_eq!(noise.lfsr().state(), 0x3FFF);
    }

    #[test]
    fn test_noise_clock_is_clamped() {
        let mut noise = LfsrNoise::new(Lfsr::default(), 1.0e9, 0.1, 48000);
        noise.next_sample();
        assert_eq!(noise.lfsr().state(), 0x3FFF);

        let mut silent_clock = LfsrNoise::new(Lfsr::default(), -100.0, 0.1, 48000);
        silent_clock.next_sample();
        assert_eq!(silent_clock.lfsr().state(), 0x7FFF);
    }
}
