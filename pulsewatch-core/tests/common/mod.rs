//! Common test utilities for integration tests
//!
//! This module provides:
//! - Synthetic PPG waveforms with known beat times
//! - Scripted sensor adapters that follow the virtual clock
//! - A display that records every call for assertions

#![allow(dead_code)]

pub mod fakes;
pub mod generators;

use pulsewatch_core::{time::Timestamp, PipelineConfig, Session, TickOutcome};

/// Feed `session` every sample of `signal` from `from_ms` to `to_ms`
/// (inclusive) at the configured sampling interval.
pub fn drive(
    session: &mut Session,
    signal: &generators::PpgGenerator,
    from_ms: Timestamp,
    to_ms: Timestamp,
) -> Vec<(Timestamp, TickOutcome)> {
    let step = session.config().sample_interval_ms as usize;
    (from_ms..=to_ms)
        .step_by(step)
        .map(|t| (t, session.tick(t, Ok(signal.value_at(t)))))
        .collect()
}

/// Default configuration; every integration scenario starts here
pub fn default_session() -> Session {
    Session::new(PipelineConfig::default()).expect("default config is valid")
}
