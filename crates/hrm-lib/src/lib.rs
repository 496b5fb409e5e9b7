//! Heart-rate monitor: beat detection and summary statistics for single-lead
//! ECG traces.

pub mod config;
pub mod detectors;
pub mod error;
pub mod io;
pub mod metrics;
pub mod observer;
pub mod pipeline;
pub mod plot;
pub mod signal;
pub mod synthetic;

pub use config::HrmConfig;
pub use error::{HrmError, Result};
pub use observer::{
    LogObserver, NullObserver, PipelineObserver, RecordingObserver, Stage, WarningKind,
};
pub use pipeline::{analyze, summarize, Analysis, Summary};
pub use signal::{Beats, Trace};
