//! Constants for PulseWatch Core
//!
//! Every default used by the pipeline is defined here with its unit in the
//! name. Configuration structs start from these values; nothing else in the
//! crate should carry a bare number for a timing or threshold.
//!
//! ## Organization
//!
//! - **Time**: sampling, reporting and session timing
//! - **Vitals**: filter coefficients, detector parameters and
//!   classification limits

/// Sampling, reporting and session timing.
pub mod time;

/// Signal conditioning, peak detection and classification parameters.
pub mod vitals;

pub use time::{
    MS_PER_SECOND, MS_PER_MINUTE,
    DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_REPORT_INTERVAL_MS,
    DEFAULT_STABILIZATION_MS, DEFAULT_MEASUREMENT_WINDOW_MS,
};

pub use vitals::{
    PEAK_WINDOW_CAPACITY, MAX_CONDITIONER_WINDOW, BPM_SMOOTHING_CAPACITY,
    BRADYCARDIA_BELOW_BPM, TACHYCARDIA_ABOVE_BPM,
    HYPOTHERMIA_BELOW_C, FEVER_ABOVE_C,
};
