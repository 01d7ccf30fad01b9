//! Error handling for dsplab
//!
//! Every error carries a stable code and, where it helps, a short list of
//! recovery suggestions that the CLI prints below the message.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for dsplab operations
pub type Result<T> = std::result::Result<T, DspLabError>;

/// Main error type for dsplab operations
#[derive(Error, Debug)]
pub enum DspLabError {
    // Parameter Errors
    #[error("Invalid parameter '{param}': {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Unstable filter: pole magnitude {magnitude:.4} is on or outside the unit circle")]
    UnstableFilter { magnitude: f64 },

    #[error("Degenerate coefficients: {reason}")]
    DegenerateCoefficients { reason: String },

    // File Errors
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<hound::Error>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DspLabError {
    /// Shorthand for an out-of-range parameter
    pub fn invalid(param: &str, value: impl ToString, expected: &str) -> Self {
        DspLabError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DspLabError::InvalidParameter { .. } => "INVALID_PARAMETER",
            DspLabError::UnstableFilter { .. } => "UNSTABLE_FILTER",
            DspLabError::DegenerateCoefficients { .. } => "DEGENERATE_COEFFICIENTS",
            DspLabError::FileNotFound { .. } => "FILE_NOT_FOUND",
            DspLabError::InvalidAudio { .. } => "INVALID_AUDIO",
            DspLabError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            DspLabError::Config { .. } => "CONFIG_ERROR",
            DspLabError::Io(_) => "IO_ERROR",
            DspLabError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by changing the inputs
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DspLabError::InvalidParameter { .. }
                | DspLabError::UnstableFilter { .. }
                | DspLabError::DegenerateCoefficients { .. }
                | DspLabError::FileNotFound { .. }
                | DspLabError::UnsupportedFormat { .. }
                | DspLabError::Config { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DspLabError::InvalidParameter { .. } => vec![
                "Check the value against the expected range",
                "Frequencies must lie strictly between 0 Hz and Nyquist",
            ],
            DspLabError::UnstableFilter { .. } => vec![
                "Move the pole inside the unit circle (|p| < 1)",
                "The impulse response of an unstable filter grows without bound",
            ],
            DspLabError::DegenerateCoefficients { .. } => vec![
                "a0 must be non-zero so the coefficients can be normalized",
            ],
            DspLabError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            DspLabError::InvalidAudio { .. } => vec![
                "Try converting the file to WAV format first",
                "The file may be corrupted - try re-exporting from source",
            ],
            DspLabError::UnsupportedFormat { .. } => vec![
                "Use 16-bit, 24-bit or 32-bit float WAV",
                "Only mono and stereo files are supported",
            ],
            DspLabError::Config { .. } => vec![
                "Delete the config file to fall back to defaults",
                "Run 'dsplab-cli config --init <path>' to write a fresh one",
            ],
            _ => vec![],
        }
    }
}
