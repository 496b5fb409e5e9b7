use crate::{
    config::BASELINE_WINDOW_S,
    error::{HrmError, Result},
    signal::Trace,
};

/// Even number of samples spanning the baseline window at this trace's sampling rate.
///
/// Fails with `InsufficientData` when the trace is shorter than one window.
pub fn baseline_window(trace: &Trace) -> Result<usize> {
    let dt = trace.sample_interval()?;
    // Nudge absorbs representation error, e.g. 0.5 / (0.05 - 0.04) landing on 49.99999.
    let mut window = (BASELINE_WINDOW_S / dt + 1e-9).floor() as usize;
    if window % 2 != 0 {
        window -= 1;
    }
    if window < 2 {
        return Err(HrmError::InvalidSampleInterval(dt));
    }
    if trace.len() < window {
        return Err(HrmError::InsufficientData {
            samples: trace.len(),
            required: window,
        });
    }
    Ok(window)
}

/// Subtract the local mean from every voltage sample.
pub fn normalize_baseline(trace: &Trace) -> Result<Vec<f64>> {
    let window = baseline_window(trace)?;
    let voltages = trace.voltages();
    let means = local_mean(voltages, window);
    Ok(voltages.iter().zip(&means).map(|(v, m)| v - m).collect())
}

/// Centered moving average, truncated (never wrapped) at the trace ends.
///
/// Interior samples average `[i - w/2, i + w/2)`. Within half a window of the
/// start the window extends forward as `[i, i + w)`; within half a window of
/// the end it extends backward as `[i - w, i)`. Either range is clipped to the
/// data.
pub fn local_mean(data: &[f64], window: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 || window == 0 {
        return data.to_vec();
    }
    let half = window / 2;
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &x in data {
        acc += x;
        prefix.push(acc);
    }

    (0..n)
        .map(|i| {
            let (lo, hi) = if i < half {
                (i, (i + window).min(n))
            } else if i + half > n {
                (i.saturating_sub(window), i)
            } else {
                (i - half, i + half)
            };
            (prefix[hi] - prefix[lo]) / (hi - lo) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_trace(fs: f64, voltages: Vec<f64>) -> Trace {
        let times = (0..voltages.len()).map(|i| i as f64 / fs).collect();
        Trace::new(times, voltages).unwrap()
    }

    #[test]
    fn window_is_half_second_and_even() {
        let trace = uniform_trace(360.0, vec![0.0; 1000]);
        assert_eq!(baseline_window(&trace).unwrap(), 180);

        // 0.5 / 0.003 = 166.67 -> 166
        let times: Vec<f64> = (0..400).map(|i| i as f64 * 0.003).collect();
        let trace = Trace::new(times, vec![0.0; 400]).unwrap();
        assert_eq!(baseline_window(&trace).unwrap(), 166);

        // 0.5 / 0.0045 = 111.1 -> 111 -> 110
        let times: Vec<f64> = (0..400).map(|i| i as f64 * 0.0045).collect();
        let trace = Trace::new(times, vec![0.0; 400]).unwrap();
        assert_eq!(baseline_window(&trace).unwrap(), 110);
    }

    #[test]
    fn window_survives_interval_rounding() {
        // 0.05 - 0.04 lands just above 0.01, so 0.5 / dt falls just below 50
        let trace = uniform_trace(100.0, vec![0.0; 100]);
        let dt = trace.sample_interval().unwrap();
        assert!(BASELINE_WINDOW_S / dt < 50.0);
        assert_eq!(baseline_window(&trace).unwrap(), 50);

        let trace = uniform_trace(360.0, vec![0.0; 400]);
        let dt = trace.sample_interval().unwrap();
        assert!((BASELINE_WINDOW_S / dt - 180.0).abs() < 1e-9);
        assert_eq!(baseline_window(&trace).unwrap(), 180);
    }

    #[test]
    fn short_trace_is_insufficient() {
        let trace = uniform_trace(100.0, vec![0.0; 10]);
        let err = baseline_window(&trace).unwrap_err();
        assert!(matches!(
            err,
            HrmError::InsufficientData {
                samples: 10,
                required: 50
            }
        ));
        assert!(normalize_baseline(&trace).is_err());
    }

    #[test]
    fn coarse_sampling_is_rejected() {
        let trace = uniform_trace(2.0, vec![0.0; 20]);
        assert!(matches!(
            baseline_window(&trace),
            Err(HrmError::InvalidSampleInterval(_))
        ));
    }

    #[test]
    fn local_mean_truncates_at_edges() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let means = local_mean(&data, 4);
        // start: forward window [i, i+4)
        assert_eq!(means[0], 2.5);
        assert_eq!(means[1], 3.5);
        // interior: [i-2, i+2)
        assert_eq!(means[2], 2.5);
        assert_eq!(means[6], 6.5);
        // end: backward window [i-4, i)
        assert_eq!(means[7], 5.5);
    }

    #[test]
    fn constant_offset_is_removed() {
        let trace = uniform_trace(100.0, vec![2.5; 300]);
        let normalized = normalize_baseline(&trace).unwrap();
        assert_eq!(normalized.len(), 300);
        assert!(normalized.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn linear_drift_is_flattened_in_the_interior() {
        let fs = 100.0;
        let voltages: Vec<f64> = (0..500).map(|i| 0.01 * i as f64).collect();
        let trace = uniform_trace(fs, voltages);
        let normalized = normalize_baseline(&trace).unwrap();
        // interior window [i-25, i+25) has mean v[i] - 0.005
        for v in &normalized[25..475] {
            assert!((v - 0.005).abs() < 1e-9);
        }
    }
}
