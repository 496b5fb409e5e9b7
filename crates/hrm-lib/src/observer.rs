//! Progress and warning reporting for a pipeline run.
//!
//! The library never logs on its own; callers pass an observer and decide
//! where messages go.

use std::fmt;

/// Non-fatal conditions noticed while loading or analysing a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A voltage sample exceeded the configured limit (reported once per load).
    HighVoltage,
    /// An unparseable row was replaced by the previous row's values.
    RowRepaired,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::HighVoltage => write!(f, "high-voltage"),
            WarningKind::RowRepaired => write!(f, "row-repaired"),
        }
    }
}

/// Pipeline checkpoints, in the order a successful run passes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loaded,
    StatisticsComputed,
    Normalized,
    Calibrated,
    BeatsDetected,
    RateEstimated,
    SummaryWritten,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Loaded => "trace loaded",
            Stage::StatisticsComputed => "voltage extremes and duration computed",
            Stage::Normalized => "baseline removed",
            Stage::Calibrated => "threshold calibrated",
            Stage::BeatsDetected => "beats detected",
            Stage::RateEstimated => "heart rate estimated",
            Stage::SummaryWritten => "summary written",
        };
        f.write_str(label)
    }
}

pub trait PipelineObserver {
    fn on_warning(&mut self, kind: WarningKind, detail: &str);
    fn on_info(&mut self, stage: Stage);
}

/// Forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_warning(&mut self, kind: WarningKind, detail: &str) {
        log::warn!("{}: {}", kind, detail);
    }

    fn on_info(&mut self, stage: Stage) {
        log::info!("{}", stage);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_warning(&mut self, _kind: WarningKind, _detail: &str) {}
    fn on_info(&mut self, _stage: Stage) {}
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub warnings: Vec<(WarningKind, String)>,
    pub stages: Vec<Stage>,
}

impl RecordingObserver {
    pub fn warning_count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|(k, _)| *k == kind).count()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_warning(&mut self, kind: WarningKind, detail: &str) {
        self.warnings.push((kind, detail.to_string()));
    }

    fn on_info(&mut self, stage: Stage) {
        self.stages.push(stage);
    }
}
