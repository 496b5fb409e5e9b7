use std::io;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, HrmError>;

/// Every way a single recording can fail to produce a summary.
#[derive(Error, Debug)]
pub enum HrmError {
    /// A row could not be parsed and there is no earlier row to carry forward.
    #[error("malformed input at row {row}: {detail}")]
    MalformedInput { row: usize, detail: String },

    #[error("trace is empty")]
    EmptyTrace,

    #[error("time column has {times} samples but voltage column has {voltages}")]
    LengthMismatch { times: usize, voltages: usize },

    #[error("timestamp decreases at row {row} ({previous} -> {current})")]
    UnorderedTimestamps {
        row: usize,
        previous: f64,
        current: f64,
    },

    #[error("sample interval must be positive and finite, got {0}")]
    InvalidSampleInterval(f64),

    /// The trace cannot hold one baseline window.
    #[error("trace has {samples} samples, baseline window needs at least {required}")]
    InsufficientData { samples: usize, required: usize },

    /// Too few local extrema to pick a robust amplitude threshold.
    #[error(
        "need at least {required} local maxima and minima, found {maxima} maxima and {minima} minima"
    )]
    InsufficientExtrema {
        maxima: usize,
        minima: usize,
        required: usize,
    },

    #[error("no beats detected above threshold")]
    NoBeatsDetected,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
