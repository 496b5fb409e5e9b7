use super::{extrema::strict_local_maxima, threshold::Calibration};
use crate::signal::Beats;

/// Accept peaks of the rectified trace that clear `fraction * threshold`,
/// keeping each beat more than `refractory_s` after the previous one.
///
/// Times come from `times`; amplitudes are the signed baseline-removed values,
/// not the rectified ones. An empty result is returned as-is; rate estimation
/// reports it.
pub fn detect_beats(
    times: &[f64],
    normalized: &[f64],
    calibration: &Calibration,
    fraction: f64,
    refractory_s: f64,
) -> Beats {
    let cut = &calibration.cut;
    let level = fraction * calibration.threshold;
    let mut beats = Beats::default();
    let mut last_time: Option<f64> = None;

    for i in strict_local_maxima(cut) {
        if cut[i] <= level {
            continue;
        }
        let t = times[i];
        let clear_of_previous = match last_time {
            None => true,
            Some(prev) => t - prev > refractory_s,
        };
        if clear_of_previous {
            beats.push(i, t, normalized[i]);
            last_time = Some(t);
        }
    }
    beats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::threshold::Polarity;

    fn calibration(cut: Vec<f64>, threshold: f64) -> Calibration {
        Calibration {
            polarity: Polarity::Positive,
            threshold,
            cut,
        }
    }

    fn times(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn keeps_peaks_above_fraction_of_threshold() {
        let mut cut = vec![0.0; 40];
        cut[5] = 1.0;
        cut[15] = 0.6; // below 0.65
        cut[25] = 0.7;
        let normalized = cut.clone();
        let beats = detect_beats(&times(40, 0.1), &normalized, &calibration(cut, 1.0), 0.65, 0.3);
        assert_eq!(beats.indices, vec![5, 25]);
        assert!((beats.times[1] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn enforces_refractory_interval() {
        let mut cut = vec![0.0; 40];
        cut[5] = 1.0;
        cut[7] = 1.0; // 0.2 s later, inside the refractory interval
        cut[12] = 1.0; // 0.7 s after first
        let beats = detect_beats(
            &times(40, 0.1),
            &cut.clone(),
            &calibration(cut, 1.0),
            0.65,
            0.3,
        );
        assert_eq!(beats.indices, vec![5, 12]);
        for w in beats.times.windows(2) {
            assert!(w[1] - w[0] > 0.3);
        }
    }

    #[test]
    fn amplitude_is_signed_normalized_value() {
        let mut cut = vec![0.0; 10];
        cut[4] = 2.0;
        let mut normalized = vec![0.0; 10];
        normalized[4] = -2.0;
        let cal = Calibration {
            polarity: Polarity::Negative,
            threshold: 2.0,
            cut,
        };
        let beats = detect_beats(&times(10, 0.01), &normalized, &cal, 0.65, 0.3);
        assert_eq!(beats.amplitudes, vec![-2.0]);
    }

    #[test]
    fn nothing_above_threshold_gives_no_beats() {
        let cut = vec![0.0, 0.1, 0.0, 0.2, 0.0];
        let beats = detect_beats(&times(5, 0.1), &cut.clone(), &calibration(cut, 1.0), 0.65, 0.3);
        assert!(beats.is_empty());
    }
}
