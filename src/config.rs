//! Lab configuration
//!
//! Defaults shared by the CLI commands. Stored as JSON; every field is
//! optional in the file and falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::WindowType;
use crate::engine::io::SUPPORTED_BIT_DEPTHS;
use crate::error::{DspLabError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Sample rate for design and rendering (Hz)
    pub sample_rate: u32,
    /// Impulse response length in samples
    pub ir_length: usize,
    /// DFT size used on the impulse response
    pub dft_size: usize,
    /// Points on the analytic response grid (half are reported)
    pub response_points: usize,
    /// Lowest dB value reported in responses
    pub floor_db: f64,
    /// WAV export bit depth
    pub bit_depth: u16,
    /// FFT size for the spectrum analyzer
    pub fft_size: usize,
    /// Analyzer smoothing between frames
    pub smoothing: f32,
    pub window: WindowType,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            ir_length: 128,
            dft_size: 512,
            response_points: 512,
            floor_db: -80.0,
            bit_depth: 24,
            fft_size: 4096,
            smoothing: 0.8,
            window: WindowType::Blackman,
        }
    }
}

impl LabConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DspLabError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: LabConfig = serde_json::from_str(&content).map_err(|e| DspLabError::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;

        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Write as pretty JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        log::info!("wrote config {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(DspLabError::Config { reason });

        if self.sample_rate == 0 {
            return fail("sample_rate must be positive".into());
        }
        if self.ir_length == 0 {
            return fail("ir_length must be at least 1".into());
        }
        if self.dft_size < 2 {
            return fail(format!("dft_size {} is too small (min 2)", self.dft_size));
        }
        if self.response_points < 2 {
            return fail(format!(
                "response_points {} is too small (min 2)",
                self.response_points
            ));
        }
        if !self.floor_db.is_finite() || self.floor_db >= 0.0 {
            return fail(format!("floor_db {} must be negative", self.floor_db));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return fail(format!(
                "bit_depth {} not supported (16, 24 or 32)",
                self.bit_depth
            ));
        }
        if self.fft_size < 2 {
            return fail(format!("fft_size {} is too small (min 2)", self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return fail(format!("smoothing {} must be in [0, 1)", self.smoothing));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        LabConfig::default().validate().unwrap();
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("lab.json");

        let config = LabConfig {
            sample_rate: 44100,
            floor_db: -60.0,
            window: WindowType::Hann,
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(LabConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "ir_length": 256 }"#).unwrap();

        let config = LabConfig::load(&path).unwrap();
        assert_eq!(config.ir_length, 256);
        assert_eq!(config.sample_rate, 48000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "bit_depth": 8 }"#).unwrap();

        let err = LabConfig::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ sample_rate: ").unwrap();

        let err = LabConfig::load(&path).unwrap_err();
        assert!(matches!(err, DspLabError::Config { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = LabConfig::load(Path::new("/no/such/lab.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
        assert_eq!(LabConfig::load_or_default(None).unwrap(), LabConfig::default());
    }
}
