//! Vital-Sign Processing Constants
//!
//! Filter coefficients, detector parameters, buffer capacities and the
//! classification limits used for the on-device health categories.

// ===== SIGNAL CONDITIONING =====

/// High-pass feedback coefficient α.
///
/// Removes slow baseline drift (respiration, contact pressure) while keeping
/// the systolic upstroke.
pub const DEFAULT_HIGH_PASS_ALPHA: f32 = 0.95;

/// Low-pass smoothing coefficient β.
pub const DEFAULT_LOW_PASS_BETA: f32 = 0.10;

/// Default moving-average window W (samples).
pub const DEFAULT_CONDITIONER_WINDOW: usize = 5;

/// Storage capacity of the conditioner moving average.
///
/// Runtime window sizes from 1 to this value are accepted.
pub const MAX_CONDITIONER_WINDOW: usize = 10;

// ===== PEAK DETECTION =====

/// Number of beat timestamps retained for BPM averaging.
pub const PEAK_WINDOW_CAPACITY: usize = 5;

/// Fraction of the observed min-max span at which the adaptive threshold
/// sits.
pub const DEFAULT_THRESHOLD_FRACTION: f32 = 0.6;

/// Release level as a fraction of the trigger threshold.
pub const DEFAULT_HYSTERESIS_RATIO: f32 = 0.8;

/// Adaptive threshold before the first update.
///
/// The high-pass stage centres the conditioned signal on zero, so zero is
/// the resting baseline.
pub const DEFAULT_INITIAL_THRESHOLD: f32 = 0.0;

/// Fixed trigger level used by the draft firmware on moving-averaged raw
/// ADC counts (12-bit SAADC).
pub const LEGACY_FIXED_THRESHOLD: f32 = 2300.0;

// ===== BPM ESTIMATION =====

/// Capacity of the BPM smoothing average.
pub const BPM_SMOOTHING_CAPACITY: usize = 5;

// ===== CLASSIFICATION =====

/// Heart rates strictly below this are bradycardia (BPM).
pub const BRADYCARDIA_BELOW_BPM: u32 = 60;

/// Heart rates strictly above this are tachycardia (BPM).
pub const TACHYCARDIA_ABOVE_BPM: u32 = 100;

/// Temperatures strictly below this are hypothermia (°C).
///
/// The sensor measures skin/die temperature, not core temperature, so the
/// limits sit well below the clinical 35 °C / 38 °C pair.
pub const HYPOTHERMIA_BELOW_C: f32 = 28.0;

/// Temperatures strictly above this are fever (°C).
pub const FEVER_ABOVE_C: f32 = 34.0;

/// Temperature resolution of the 4-bit fractional register (°C per count).
pub const TEMPERATURE_FRACTION_STEP_C: f32 = 0.0625;
