pub mod baseline;
pub mod beats;
pub mod extrema;
pub mod threshold;

pub use baseline::{baseline_window, normalize_baseline};
pub use beats::detect_beats;
pub use extrema::{strict_local_maxima, strict_local_minima};
pub use threshold::{calibrate, Calibration, Polarity};
