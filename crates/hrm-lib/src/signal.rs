use crate::error::{HrmError, Result};

/// Single-lead ECG recording: timestamps in seconds, voltages in millivolts.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    times: Vec<f64>,
    voltages: Vec<f64>,
}

impl Trace {
    /// Build a trace from two parallel columns.
    ///
    /// Timestamps may repeat (a repaired row duplicates its predecessor) but
    /// never decrease.
    pub fn new(times: Vec<f64>, voltages: Vec<f64>) -> Result<Self> {
        if times.len() != voltages.len() {
            return Err(HrmError::LengthMismatch {
                times: times.len(),
                voltages: voltages.len(),
            });
        }
        if times.is_empty() {
            return Err(HrmError::EmptyTrace);
        }
        for (row, w) in times.windows(2).enumerate() {
            if w[1] < w[0] {
                return Err(HrmError::UnorderedTimestamps {
                    row: row + 1,
                    previous: w[0],
                    current: w[1],
                });
            }
        }
        Ok(Self { times, voltages })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn voltages(&self) -> &[f64] {
        &self.voltages
    }

    /// Sampling interval inferred from the first advance in time.
    ///
    /// Measured from sample 4 so a ragged recording start does not skew the
    /// estimate; shorter traces measure from sample 0. Repeated timestamps
    /// left by repaired rows are spread over the steps they cover.
    pub fn sample_interval(&self) -> Result<f64> {
        if self.len() < 2 {
            return Err(HrmError::InsufficientData {
                samples: self.len(),
                required: 2,
            });
        }
        let start = if self.len() > 5 { 4 } else { 0 };
        let origin = self.times[start];
        self.times[start + 1..]
            .iter()
            .enumerate()
            .find_map(|(k, &t)| {
                let dt = (t - origin) / (k + 1) as f64;
                (dt.is_finite() && dt > 0.0).then_some(dt)
            })
            .ok_or(HrmError::InvalidSampleInterval(0.0))
    }

    /// Global (min, max) of the raw voltage column.
    pub fn voltage_extremes(&self) -> (f64, f64) {
        self.voltages
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Recording length, taken as the largest timestamp.
    pub fn duration(&self) -> f64 {
        self.times.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Detected beats in time order, with the baseline-removed amplitude at each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Beats {
    pub indices: Vec<usize>,
    pub times: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

impl Beats {
    pub fn push(&mut self, index: usize, time: f64, amplitude: f64) {
        self.indices.push(index);
        self.times.push(time);
        self.amplitudes.push(amplitude);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Beat-to-beat intervals in seconds.
    pub fn intervals(&self) -> Vec<f64> {
        self.times.windows(2).map(|w| w[1] - w[0]).collect()
    }
}
