use crate::{
    config::HrmConfig,
    detectors::{calibrate, detect_beats, normalize_baseline, Polarity},
    error::Result,
    metrics::mean_hr_bpm,
    observer::{PipelineObserver, Stage},
    signal::{Beats, Trace},
};
use serde::{Deserialize, Serialize};

/// The record produced for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean_hr_bpm: f64,
    /// (min, max) of the raw voltage column, millivolts.
    pub voltage_extremes: (f64, f64),
    /// Largest timestamp in the recording, seconds.
    pub duration: f64,
    pub num_beats: usize,
    /// Beat times in seconds.
    pub beats: Vec<f64>,
}

/// Summary plus the intermediate detail that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: Summary,
    pub beats: Beats,
    pub polarity: Polarity,
    pub threshold: f64,
}

/// Run baseline removal, calibration, beat detection and rate estimation on a
/// loaded trace.
///
/// Either every stage succeeds and a complete summary is returned, or the
/// first failing stage's error is.
pub fn analyze(
    trace: &Trace,
    cfg: &HrmConfig,
    observer: &mut dyn PipelineObserver,
) -> Result<Analysis> {
    cfg.validate()?;

    let voltage_extremes = trace.voltage_extremes();
    let duration = trace.duration();
    observer.on_info(Stage::StatisticsComputed);

    let normalized = normalize_baseline(trace)?;
    observer.on_info(Stage::Normalized);

    let calibration = calibrate(&normalized, cfg.extrema_rank)?;
    observer.on_info(Stage::Calibrated);

    let beats = detect_beats(
        trace.times(),
        &normalized,
        &calibration,
        cfg.threshold_fraction,
        cfg.refractory_s,
    );
    observer.on_info(Stage::BeatsDetected);

    let rate = mean_hr_bpm(&beats)?;
    observer.on_info(Stage::RateEstimated);

    let summary = Summary {
        mean_hr_bpm: rate,
        voltage_extremes,
        duration,
        num_beats: beats.len(),
        beats: beats.times.clone(),
    };
    Ok(Analysis {
        summary,
        beats,
        polarity: calibration.polarity,
        threshold: calibration.threshold,
    })
}

pub fn summarize(
    trace: &Trace,
    cfg: &HrmConfig,
    observer: &mut dyn PipelineObserver,
) -> Result<Summary> {
    analyze(trace, cfg, observer).map(|analysis| analysis.summary)
}
