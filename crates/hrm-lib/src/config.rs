use crate::error::{HrmError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Width of the centered moving-average window used for baseline removal (seconds).
pub const BASELINE_WINDOW_S: f64 = 0.5;

/// Tunable parameters for beat detection and input screening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrmConfig {
    /// Minimum spacing between accepted beats (seconds).
    pub refractory_s: f64,
    /// Fraction of the calibration threshold a peak must exceed.
    pub threshold_fraction: f64,
    /// Which largest extremum (1-based) sets the calibration threshold.
    pub extrema_rank: usize,
    /// Voltage above which a high-voltage warning is raised (millivolts).
    pub voltage_limit_mv: f64,
}

impl Default for HrmConfig {
    fn default() -> Self {
        Self {
            refractory_s: 0.3,
            threshold_fraction: 0.65,
            extrema_rank: 10,
            voltage_limit_mv: 300.0,
        }
    }
}

impl HrmConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: HrmConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.refractory_s.is_finite() || self.refractory_s < 0.0 {
            return Err(HrmError::InvalidConfig(format!(
                "refractory_s must be a non-negative number, got {}",
                self.refractory_s
            )));
        }
        if !(self.threshold_fraction > 0.0 && self.threshold_fraction <= 1.0) {
            return Err(HrmError::InvalidConfig(format!(
                "threshold_fraction must be in (0, 1], got {}",
                self.threshold_fraction
            )));
        }
        if self.extrema_rank == 0 {
            return Err(HrmError::InvalidConfig(
                "extrema_rank must be at least 1".into(),
            ));
        }
        if !self.voltage_limit_mv.is_finite() {
            return Err(HrmError::InvalidConfig(format!(
                "voltage_limit_mv must be finite, got {}",
                self.voltage_limit_mv
            )));
        }
        Ok(())
    }
}
