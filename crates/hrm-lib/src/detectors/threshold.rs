use super::extrema::{strict_local_maxima, strict_local_minima};
use crate::error::{HrmError, Result};
use serde::{Deserialize, Serialize};

/// Which side of the baseline carries the beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Output of threshold calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub polarity: Polarity,
    /// Magnitude of the `rank`-th largest extremum on the dominant side.
    pub threshold: f64,
    /// One-sided magnitude of the normalized trace; the other side is zeroed.
    pub cut: Vec<f64>,
}

/// Pick the dominant polarity and its amplitude threshold from the extrema of a
/// baseline-removed trace.
///
/// Ranking by the `rank`-th largest extremum rather than the largest keeps a
/// few artifact spikes from inflating the threshold. Ties go to positive.
pub fn calibrate(normalized: &[f64], rank: usize) -> Result<Calibration> {
    let maxima = sorted_magnitudes(normalized, &strict_local_maxima(normalized));
    let minima = sorted_magnitudes(normalized, &strict_local_minima(normalized));
    let rank = rank.max(1);
    if maxima.len() < rank || minima.len() < rank {
        return Err(HrmError::InsufficientExtrema {
            maxima: maxima.len(),
            minima: minima.len(),
            required: rank,
        });
    }

    let max_norm = maxima[maxima.len() - rank];
    let min_norm = minima[minima.len() - rank];
    let (polarity, threshold) = if max_norm >= min_norm {
        (Polarity::Positive, max_norm)
    } else {
        (Polarity::Negative, min_norm)
    };

    let cut = normalized
        .iter()
        .map(|&v| match polarity {
            Polarity::Positive if v < 0.0 => 0.0,
            Polarity::Negative if v > 0.0 => 0.0,
            _ => v.abs(),
        })
        .collect();

    Ok(Calibration {
        polarity,
        threshold,
        cut,
    })
}

fn sorted_magnitudes(data: &[f64], indices: &[usize]) -> Vec<f64> {
    let mut out: Vec<f64> = indices.iter().map(|&i| data[i].abs()).collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Alternating peaks and troughs separated by zeros.
    fn pulses(peaks: &[f64], troughs: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0];
        for (&p, &t) in peaks.iter().zip(troughs) {
            out.extend_from_slice(&[p, 0.0, t, 0.0]);
        }
        out
    }

    #[test]
    fn positive_polarity_when_peaks_dominate() {
        let peaks: Vec<f64> = (1..=12).map(|k| k as f64).collect();
        let troughs = vec![-0.5; 12];
        let cal = calibrate(&pulses(&peaks, &troughs), 10).unwrap();
        assert_eq!(cal.polarity, Polarity::Positive);
        // 10th largest of 1..=12 is 3
        assert_eq!(cal.threshold, 3.0);
        assert!(cal.cut.iter().all(|&v| v >= 0.0));
        assert_eq!(cal.cut[3], 0.0);
        assert_eq!(cal.cut[1], 1.0);
    }

    #[test]
    fn negative_polarity_rectifies_troughs() {
        let peaks = vec![0.2; 11];
        let troughs: Vec<f64> = (1..=11).map(|k| -(k as f64)).collect();
        let data = pulses(&peaks, &troughs);
        let cal = calibrate(&data, 10).unwrap();
        assert_eq!(cal.polarity, Polarity::Negative);
        assert_eq!(cal.threshold, 2.0);
        assert_eq!(cal.cut[1], 0.0);
        assert_eq!(cal.cut[3], 1.0);
    }

    #[test]
    fn tie_prefers_positive() {
        let data = pulses(&[1.0; 10], &[-1.0; 10]);
        let cal = calibrate(&data, 10).unwrap();
        assert_eq!(cal.polarity, Polarity::Positive);
        assert_eq!(cal.threshold, 1.0);
    }

    #[test]
    fn too_few_maxima() {
        let data = pulses(&[1.0; 5], &[-1.0; 5]);
        let err = calibrate(&data, 10).unwrap_err();
        assert!(matches!(
            err,
            HrmError::InsufficientExtrema {
                maxima: 5,
                minima: 5,
                required: 10
            }
        ));
    }

    #[test]
    fn single_outlier_leaves_threshold_unchanged() {
        let data = pulses(&[1.0; 19], &[-0.3; 19]);
        let baseline = calibrate(&data, 10).unwrap();

        let mut spiked = data.clone();
        // first peak blown up tenfold
        spiked[1] = 10.0;
        let with_outlier = calibrate(&spiked, 10).unwrap();

        assert_eq!(baseline.threshold, with_outlier.threshold);
        assert_eq!(baseline.polarity, with_outlier.polarity);
    }
}
