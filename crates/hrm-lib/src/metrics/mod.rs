pub mod rate;

pub use rate::mean_hr_bpm;
