use crate::{
    error::{HrmError, Result},
    signal::Beats,
};

/// Mean heart rate in beats per minute: beat count over the time from the
/// start of the recording to the last beat.
///
/// This is not an average of inter-beat intervals. The span starts at t = 0,
/// so a recording whose first beat comes late reads lower than its true rate.
pub fn mean_hr_bpm(beats: &Beats) -> Result<f64> {
    match beats.last_time() {
        Some(last) if last > 0.0 => Ok(beats.len() as f64 / last * 60.0),
        _ => Err(HrmError::NoBeatsDetected),
    }
}
