//! Adapter Traits for the Vital-Sign Pipeline
//!
//! The pipeline core never touches hardware. Everything it needs from the
//! outside world comes through these traits, so the same [`Monitor`] runs
//! against a real MAX30102 on an nRF52 timer in firmware and against
//! scripted fakes on a virtual clock in tests.
//!
//! ## Module Organization
//!
//! - [`sensor`] - PPG and temperature sample sources
//! - [`display`] - Fire-and-forget rendering of values, labels and
//!   categories
//! - [`scheduler`] - Periodic tick registration and delivery
//!
//! ## Contracts
//!
//! - Sensor reads are synchronous and bounded by the hardware; they run
//!   inside the tick and count against its budget.
//! - Display calls are assumed bounded but slow; the monitor only issues
//!   them at the report cadence.
//! - The scheduler owns time: every tick carries the timestamp the
//!   pipeline uses.
//!
//! [`Monitor`]: crate::monitor::Monitor

pub mod display;
pub mod scheduler;
pub mod sensor;

pub use display::Display;
pub use scheduler::Scheduler;
pub use sensor::{PulseSensor, TemperatureSensor};
