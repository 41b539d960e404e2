//! Error Types for the Vital-Sign Pipeline
//!
//! ## Design Philosophy
//!
//! Errors follow the same embedded constraints as the rest of the pipeline:
//!
//! 1. **Small Size**: every variant is a few bytes; reasons are `&'static str`.
//! 2. **No Heap Allocation**: nothing in an error owns memory.
//! 3. **Copy Semantics**: errors are returned from the tick path and stored
//!    in statistics without moves.
//!
//! ## Error Categories
//!
//! ### Adapter Failures
//! - [`SensorError`]: a bus NACK, conversion timeout or unusable sample.
//!   The pipeline never propagates these per tick; it holds the last valid
//!   filtered value and counts the fault.
//!
//! ### Startup Failures
//! - `SchedulerRegistration`: the periodic tick could not be registered.
//!   Unrecoverable; surfaced to the caller of `Monitor::run`.
//! - `InvalidConfig`: a configuration value is out of its accepted range.
//!
//! ### Not Errors
//! Fewer than two beats is *insufficient data*, reported as BPM 0 and
//! `HeartRateCategory::NoReading`. It never appears in this module.
//!
//! ```rust
//! use pulsewatch_core::{PipelineConfig, VitalsError};
//!
//! let config = PipelineConfig::default().with_refractory_ms(0);
//! assert!(matches!(config.validate(), Err(VitalsError::InvalidConfig { .. })));
//! ```

use thiserror_no_std::Error;

/// Result type for pipeline operations
pub type VitalsResult<T> = Result<T, VitalsError>;

/// Failure reported by a sensor adapter
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Device did not acknowledge its address or a data byte
    #[error("Bus transaction not acknowledged")]
    Nack,

    /// Conversion did not complete within the hardware bound
    #[error("Conversion timed out")]
    Timeout,

    /// Device returned a value the pipeline cannot use (NaN, out of range)
    #[error("Invalid sample: {reason}")]
    InvalidSample {
        /// What was wrong with the sample
        reason: &'static str,
    },
}

/// Pipeline-level errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum VitalsError {
    /// Configuration value rejected during validation
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending option
        field: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The scheduler refused to register the periodic tick
    #[error("Scheduler registration failed: {reason}")]
    SchedulerRegistration {
        /// Scheduler-provided reason
        reason: &'static str,
    },

    /// A sensor adapter failed outside the tick path (startup probing)
    #[error("Sensor failure: {0}")]
    Sensor(SensorError),
}

impl From<SensorError> for VitalsError {
    fn from(error: SensorError) -> Self {
        VitalsError::Sensor(error)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Nack => defmt::write!(fmt, "Bus NACK"),
            Self::Timeout => defmt::write!(fmt, "Conversion timeout"),
            Self::InvalidSample { reason } => defmt::write!(fmt, "Invalid sample: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for VitalsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidConfig { field, reason } =>
                defmt::write!(fmt, "Invalid config {}: {}", field, reason),
            Self::SchedulerRegistration { reason } =>
                defmt::write!(fmt, "Scheduler registration: {}", reason),
            Self::Sensor(error) =>
                defmt::write!(fmt, "Sensor: {}", error),
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn sensor_error_converts() {
        let err: VitalsError = SensorError::Timeout.into();
        assert_eq!(err, VitalsError::Sensor(SensorError::Timeout));
    }

    #[test]
    fn messages_name_the_field() {
        let err = VitalsError::InvalidConfig { field: "window", reason: "must be non-zero" };
        let text = std::format!("{}", err);
        assert!(text.contains("window"));
        assert!(text.contains("must be non-zero"));
    }
}
