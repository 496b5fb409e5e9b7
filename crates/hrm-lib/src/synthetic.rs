//! Synthetic single-lead ECG traces for demos and tests.

use crate::{error::Result, signal::Trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::PI;

/// Regular beat train with R, S and T waves, slow baseline wander and
/// optional uniform noise.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticEcg {
    /// Sampling frequency in Hz.
    pub fs: f64,
    pub duration_s: f64,
    /// Time of the first R peak.
    pub first_beat_s: f64,
    /// Spacing between R peaks.
    pub rr_s: f64,
    /// R-wave height in millivolts; S and T scale with it.
    pub amplitude_mv: f64,
    pub wander_mv: f64,
    pub wander_hz: f64,
    /// Half-width of the uniform noise band (0 disables noise).
    pub noise_mv: f64,
    pub seed: u64,
}

impl Default for SyntheticEcg {
    fn default() -> Self {
        Self {
            fs: 360.0,
            duration_s: 14.0,
            first_beat_s: 0.05,
            rr_s: 0.75,
            amplitude_mv: 1.0,
            wander_mv: 0.05,
            wander_hz: 0.25,
            noise_mv: 0.0,
            seed: 0,
        }
    }
}

impl SyntheticEcg {
    /// R-peak times that fall inside the recording.
    pub fn beat_times(&self) -> Vec<f64> {
        let mut out = Vec::new();
        if self.rr_s <= 0.0 {
            return out;
        }
        let mut t = self.first_beat_s;
        while t < self.duration_s {
            out.push(t);
            t += self.rr_s;
        }
        out
    }

    pub fn generate(&self) -> Result<Trace> {
        let samples = (self.duration_s * self.fs) as usize;
        let beats = self.beat_times();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut times = Vec::with_capacity(samples);
        let mut voltages = Vec::with_capacity(samples);
        for i in 0..samples {
            let t = i as f64 / self.fs;
            let mut v = self.wander_mv * (2.0 * PI * self.wander_hz * t).sin();
            for &bt in &beats {
                // only the complex around this beat contributes measurably
                if (t - bt).abs() > 0.5 {
                    continue;
                }
                v += self.amplitude_mv * gaussian(t, bt, 0.02);
                v -= 0.2 * self.amplitude_mv * gaussian(t, bt + 0.03, 0.01);
                v += 0.15 * self.amplitude_mv * gaussian(t, bt + 0.25, 0.04);
            }
            if self.noise_mv > 0.0 {
                v += rng.gen_range(-self.noise_mv..=self.noise_mv);
            }
            times.push(t);
            voltages.push(v);
        }
        Trace::new(times, voltages)
    }
}

fn gaussian(t: f64, center: f64, width: f64) -> f64 {
    (-0.5 * ((t - center) / width).powi(2)).exp()
}
