//! Audio Buffer
//!
//! Non-interleaved 32-bit float storage used by every renderer and by the
//! WAV import/export path.

use crate::error::{DspLabError, Result};

/// Default sample rate for rendering (48kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Channel Layout
// ============================================================================

/// Audio channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelLayout {
    /// Single channel (mono)
    #[default]
    Mono,
    /// Two channels (stereo: left, right)
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    /// Create a ChannelLayout from a channel count
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            _ => None,
        }
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Rendered or imported audio
///
/// # Example
/// ```
/// use dsplab::engine::{AudioBuffer, ChannelLayout};
///
/// let buffer = AudioBuffer::new(48000, ChannelLayout::Stereo, 48000);
/// assert_eq!(buffer.channels(), 2);
/// assert_eq!(buffer.len(), 48000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Sample data: outer Vec is channels, inner Vec is samples
    pub samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a silent buffer
    pub fn new(num_samples: usize, layout: ChannelLayout, sample_rate: u32) -> Self {
        Self {
            samples: vec![vec![0.0_f32; num_samples]; layout.num_channels()],
            sample_rate,
        }
    }

    /// Wrap a single channel of samples
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: vec![samples],
            sample_rate,
        }
    }

    /// Create an audio buffer from interleaved sample data
    ///
    /// Errors if the data length isn't a multiple of the channel count.
    pub fn from_interleaved(
        interleaved: &[f32],
        layout: ChannelLayout,
        sample_rate: u32,
    ) -> Result<Self> {
        let num_channels = layout.num_channels();

        if interleaved.len() % num_channels != 0 {
            return Err(DspLabError::InvalidAudio {
                reason: format!(
                    "Interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    num_channels
                ),
                source: None,
            });
        }

        let num_samples = interleaved.len() / num_channels;
        let mut samples = vec![Vec::with_capacity(num_samples); num_channels];

        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Convert the buffer to interleaved format (L, R, L, R, ...)
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.channels() * self.len());
        for sample_idx in 0..self.len() {
            for channel in &self.samples {
                interleaved.push(channel[sample_idx]);
            }
        }
        interleaved
    }

    /// Get the number of channels
    #[inline]
    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    /// Get the number of samples per channel
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// Immutable access to one channel
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Mutable access to one channel
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }

    /// Average all channels into one
    pub fn to_mono(&self) -> Vec<f32> {
        let channels = self.channels().max(1) as f32;
        (0..self.len())
            .map(|i| self.samples.iter().map(|ch| ch[i]).sum::<f32>() / channels)
            .collect()
    }

    /// RMS level across all channels in dB
    ///
    /// Returns -f32::INFINITY for empty or silent buffers.
    pub fn rms_db(&self) -> f32 {
        let total = self.channels() * self.len();
        if total == 0 {
            return f32::NEG_INFINITY;
        }

        let sum_squares: f64 = self
            .samples
            .iter()
            .flatten()
            .map(|&s| (s as f64) * (s as f64))
            .sum();

        linear_to_db((sum_squares / total as f64).sqrt() as f32)
    }

    /// Peak level across all channels in dB
    pub fn peak_db(&self) -> f32 {
        linear_to_db(self.peak_linear())
    }

    pub fn peak_linear(&self) -> f32 {
        self.samples
            .iter()
            .flatten()
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// True when every sample is finite (no NaN/Inf)
    pub fn is_valid(&self) -> bool {
        self.samples.iter().flatten().all(|s| s.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_to_db() {
        assert_relative_eq!(linear_to_db(0.5), -6.0206, epsilon = 1e-3);
        assert_eq!(linear_to_db(0.0), f32::NEG_INFINITY);
    }

    #[test]
    fn test_interleave_round_trip() {
        let interleaved = vec![1.0, 5.0, 2.0, 6.0, 3.0, 7.0];
        let buffer = AudioBuffer::from_interleaved(&interleaved, ChannelLayout::Stereo, 48000)
            .unwrap();
        assert_eq!(buffer.channel(0), &[1.0, 2.0, 3.0]);
        assert_eq!(buffer.channel(1), &[5.0, 6.0, 7.0]);
        assert_eq!(buffer.to_interleaved(), interleaved);
    }

    #[test]
    fn test_from_interleaved_rejects_odd_length() {
        let result = AudioBuffer::from_interleaved(&[0.0, 1.0, 2.0], ChannelLayout::Stereo, 48000);
        assert!(result.is_err());
    }

    #[test]
    fn test_levels() {
        let buffer = AudioBuffer::from_mono(vec![0.5, -0.5, 0.5, -0.5], 48000);
        assert_relative_eq!(buffer.rms_db(), linear_to_db(0.5), epsilon = 1e-5);
        assert_relative_eq!(buffer.peak_linear(), 0.5);

        let silent = AudioBuffer::new(0, ChannelLayout::Mono, 48000);
        assert_eq!(silent.rms_db(), f32::NEG_INFINITY);
        assert!(silent.is_empty());
    }

    #[test]
    fn test_to_mono() {
        let buffer =
            AudioBuffer::from_interleaved(&[1.0, 0.0, 0.5, 0.5], ChannelLayout::Stereo, 44100)
                .unwrap();
        assert_eq!(buffer.to_mono(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_is_valid_detects_nan() {
        let mut buffer = AudioBuffer::from_mono(vec![0.0; 4], 48000);
        assert!(buffer.is_valid());
        buffer.channel_mut(0)[2] = f32::NAN;
        assert!(!buffer.is_valid());
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::new(24000, ChannelLayout::Mono, 48000);
        assert_relative_eq!(buffer.duration_secs(), 0.5);
    }
}
