//! WAV file I/O
//!
//! Rendered signals are written as 16-bit, 24-bit or 32-bit float WAV.
//! Import accepts the same formats (plus 8-bit) and returns f32 samples
//! at the file's native sample rate.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::{AudioBuffer, ChannelLayout};
use crate::error::{DspLabError, Result};

/// Export bit depths we know how to write
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

fn wav_error(e: hound::Error) -> DspLabError {
    match e {
        hound::Error::IoError(io) => DspLabError::Io(io),
        other => DspLabError::InvalidAudio {
            reason: other.to_string(),
            source: Some(other),
        },
    }
}

/// Write a buffer to a WAV file
///
/// Samples are clamped to [-1, 1] for integer formats; 32-bit output is
/// written as IEEE float and left untouched.
pub fn export_wav(buffer: &AudioBuffer, path: &Path, bit_depth: u16) -> Result<()> {
    if !SUPPORTED_BIT_DEPTHS.contains(&bit_depth) {
        return Err(DspLabError::UnsupportedFormat {
            format: format!("{}-bit audio (only 16, 24, 32 supported)", bit_depth),
        });
    }

    if ChannelLayout::from_count(buffer.channels()).is_none() {
        return Err(DspLabError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", buffer.channels()),
        });
    }

    let spec = WavSpec {
        channels: buffer.channels() as u16,
        sample_rate: buffer.sample_rate,
        bits_per_sample: bit_depth,
        sample_format: if bit_depth == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_error)?;

    for sample in buffer.to_interleaved() {
        match bit_depth {
            16 => {
                let scaled = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                writer.write_sample(scaled).map_err(wav_error)?;
            }
            24 => {
                // 24-bit stored as i32 in hound
                let scaled = (sample.clamp(-1.0, 1.0) * 8_388_607.0) as i32;
                writer.write_sample(scaled).map_err(wav_error)?;
            }
            _ => writer.write_sample(sample).map_err(wav_error)?,
        }
    }

    writer.finalize().map_err(wav_error)?;

    log::info!(
        "wrote {} ({} ch, {} Hz, {}-bit, {:.3}s)",
        path.display(),
        buffer.channels(),
        buffer.sample_rate,
        bit_depth,
        buffer.duration_secs()
    );
    Ok(())
}

/// Read a WAV file into a buffer
pub fn import_wav(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(DspLabError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = WavReader::open(path).map_err(wav_error)?;
    let spec = reader.spec();

    let layout = ChannelLayout::from_count(spec.channels as usize).ok_or_else(|| {
        DspLabError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", spec.channels),
        }
    })?;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(wav_error)?,
        SampleFormat::Int => {
            let max_value = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_value))
                .collect::<std::result::Result<_, _>>()
                .map_err(wav_error)?
        }
    };

    log::debug!(
        "read {} ({} ch, {} Hz, {}-bit)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample
    );

    AudioBuffer::from_interleaved(&interleaved, layout, spec.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn ramp() -> AudioBuffer {
        AudioBuffer::from_mono(vec![-1.0, -0.5, 0.0, 0.25, 0.5, 1.0], 44100)
    }

    #[test]
    fn test_export_import_float() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");

        export_wav(&ramp(), &path, 32).unwrap();
        let loaded = import_wav(&path).unwrap();

        assert_eq!(loaded, ramp());
    }

    #[test]
    fn test_export_import_16_bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("int16.wav");

        export_wav(&ramp(), &path, 16).unwrap();
        let loaded = import_wav(&path).unwrap();

        assert_eq!(loaded.sample_rate, 44100);
        for (a, b) in loaded.channel(0).iter().zip(ramp().channel(0)) {
            assert_relative_eq!(*a, *b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_export_stereo_24_bit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let buffer =
            AudioBuffer::from_interleaved(&[0.5, -0.5, 0.25, -0.25], ChannelLayout::Stereo, 48000)
                .unwrap();

        export_wav(&buffer, &path, 24).unwrap();
        let loaded = import_wav(&path).unwrap();

        assert_eq!(loaded.channels(), 2);
        assert_relative_eq!(loaded.channel(1)[0], -0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_unsupported_bit_depth() {
        let dir = tempdir().unwrap();
        let err = export_wav(&ramp(), &dir.path().join("x.wav"), 12).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_import_missing_file() {
        let err = import_wav(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }
}
