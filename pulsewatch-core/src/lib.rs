//! Vital-sign pipeline for PulseWatch
//!
//! Turns a photoplethysmography (PPG) sample stream into heartbeats, a
//! smoothed heart rate and coarse health categories for on-device display.
//! Designed for small microcontrollers.
//!
//! Key constraints:
//! - One sample every 2 ms on a Cortex-M4 without an FPU budget to spare
//! - No heap allocation; every buffer has a compile-time capacity
//! - Hardware reached only through the adapter traits in [`traits`]
//!
//! ```text
//! PulseSensor ─► SignalConditioner ─► PeakDetector ─► BpmEstimator
//!                                                          │
//!           Display ◄── HealthClassifier ◄── (every 3 s) ──┘
//! ```
//!
//! ```rust
//! use pulsewatch_core::{PipelineConfig, Session, SessionPhase};
//!
//! let mut session = Session::new(PipelineConfig::default())?;
//! for t in (0..6000).step_by(2) {
//!     session.tick(t, Ok(2000.0));
//! }
//! assert_eq!(session.phase(), SessionPhase::Active);
//! // A flat signal has no beats
//! assert_eq!(session.bpm(), 0);
//! # Ok::<(), pulsewatch_core::VitalsError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(all(test, not(feature = "std")))]
extern crate std;

#[macro_use]
mod logging;

pub mod buffer;
pub mod classifier;
pub mod conditioner;
pub mod config;
pub mod constants;
pub mod detector;
pub mod display;
pub mod errors;
pub mod estimator;
pub mod max30102;
pub mod monitor;
pub mod scheduler;
pub mod session;
pub mod time;
pub mod traits;

// Public API
pub use classifier::{ClassificationResult, HealthClassifier, HeartRateCategory, TemperatureCategory};
pub use config::{ClassifierConfig, DetectorConfig, FilterConfig, PipelineConfig};
pub use detector::ThresholdStrategy;
pub use errors::{SensorError, VitalsError, VitalsResult};
pub use monitor::Monitor;
pub use session::{Session, SessionPhase, SessionStats, TickOutcome, VitalsReport};
pub use traits::{Display, PulseSensor, Scheduler, TemperatureSensor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
