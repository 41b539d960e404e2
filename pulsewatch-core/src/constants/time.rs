//! Time-Related Constants
//!
//! Sampling periods, report cadence and session durations used by the
//! default configuration.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Milliseconds per minute.
///
/// Numerator of the interval-to-rate conversion: `bpm = 60000 / interval_ms`.
pub const MS_PER_MINUTE: u32 = 60_000;

// ===== SAMPLING =====

/// Default PPG sampling interval (milliseconds).
///
/// 500 Hz. Comfortably above the 0.5-4 Hz cardiac band and fast enough
/// that the 650 ms refractory period is resolved to within 2 ms.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 2;

/// Interval between display refreshes and classifications (milliseconds).
///
/// Display writes are slow relative to the sampling period and must stay
/// off the per-tick path.
pub const DEFAULT_REPORT_INTERVAL_MS: u32 = 3000;

/// Interval between stabilisation progress log lines (milliseconds).
pub const STABILIZATION_LOG_INTERVAL_MS: u64 = 500;

// ===== SESSION =====

/// Time after session start during which filters settle and detection is
/// suppressed (milliseconds).
pub const DEFAULT_STABILIZATION_MS: u64 = 5000;

/// Default measurement window after which the session finishes
/// (milliseconds).
pub const DEFAULT_MEASUREMENT_WINDOW_MS: u64 = 30_000;

// ===== DETECTION TIMING =====

/// Minimum time between two registered beats (milliseconds).
///
/// Also the upper bound on detectable rate: 650 ms is 92 BPM, below the
/// tachycardia limit. Faster pulses register every other beat.
pub const DEFAULT_REFRACTORY_MS: u64 = 650;

/// Period between recomputations of the adaptive threshold (milliseconds).
pub const DEFAULT_THRESHOLD_UPDATE_MS: u64 = 1000;

/// Time without a beat after which the beat window is discarded
/// (milliseconds).
pub const DEFAULT_NO_PEAK_TIMEOUT_MS: u64 = 5000;
