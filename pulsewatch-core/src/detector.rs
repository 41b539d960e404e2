//! Adaptive Peak Detector
//!
//! ## Overview
//!
//! Turns the conditioned PPG stream into a sparse stream of beat timestamps.
//! A beat is registered on the rising edge of a pulse, when the signal
//! crosses the trigger level while the detector is disarmed and the
//! refractory period since the previous beat has elapsed.
//!
//! ```text
//!              trigger ─ ─ ─ ─╱‾‾╲─ ─ ─ ─ ─ ─ ─ ─ ─ ─╱‾‾╲─ ─
//!                            ╱    ╲                 ╱    ╲
//!              release ─ ─ ─╱─ ─ ─ ╲─ ─ ─ ─ ─ ─ ─ ─╱─ ─ ─ ╲─
//!                   ______╱         ╲_____________╱        ╲__
//!                         ↑ beat    ↑ disarm      ↑ beat    ↑ disarm
//! ```
//!
//! ## Threshold Policies
//!
//! Three policies from the firmware history are unified in
//! [`ThresholdStrategy`] and chosen once per session:
//!
//! - **Fixed**: one level, release at or below it (plain edge detection)
//! - **Hysteresis**: separate arm and release levels
//! - **Adaptive** (default): the trigger is recomputed every update period
//!   as `min + fraction·(max - min)` of the signal seen since the last
//!   update, never below the initial threshold (the conditioned baseline);
//!   the release level is `trigger · hysteresis_ratio`, never above the
//!   trigger
//!
//! ## Stale History
//!
//! When no beat has been seen for `no_peak_timeout_ms` the window is
//! emptied. An old window would otherwise keep producing a BPM long after
//! the finger left the sensor.

use heapless::Deque;

use crate::{
    config::{default_adaptive, DetectorConfig},
    constants::PEAK_WINDOW_CAPACITY,
    time::{elapsed_ms, Timestamp},
};

/// Threshold policy for beat registration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThresholdStrategy {
    /// Trigger above `level`, release at or below it
    Fixed {
        /// Trigger and release level
        level: f32,
    },

    /// Trigger above `arm`, release below `release`
    Hysteresis {
        /// Trigger level
        arm: f32,
        /// Release level, not above `arm`
        release: f32,
    },

    /// Trigger recomputed from the recent signal span
    Adaptive {
        /// Position of the trigger within the observed min-max span
        fraction: f32,
        /// Release level as a fraction of the trigger
        hysteresis_ratio: f32,
        /// Time between recomputations (ms)
        update_period_ms: u64,
        /// Trigger used until the first recomputation
        initial_threshold: f32,
    },
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        default_adaptive()
    }
}

impl ThresholdStrategy {
    /// Trigger level at session start
    pub fn initial_threshold(&self) -> f32 {
        match *self {
            ThresholdStrategy::Fixed { level } => level,
            ThresholdStrategy::Hysteresis { arm, .. } => arm,
            ThresholdStrategy::Adaptive { initial_threshold, .. } => initial_threshold,
        }
    }

    /// Whether `value` releases an armed detector at `trigger`
    fn releases(&self, value: f32, trigger: f32) -> bool {
        match *self {
            ThresholdStrategy::Fixed { .. } => value <= trigger,
            ThresholdStrategy::Hysteresis { release, .. } => value < release,
            ThresholdStrategy::Adaptive { hysteresis_ratio, .. } => {
                value < (trigger * hysteresis_ratio).min(trigger)
            }
        }
    }
}

/// Mutable threshold tracking state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdState {
    /// Current trigger level
    pub dynamic_threshold: f32,
    /// Smallest filtered value since the last update
    pub rolling_min: f32,
    /// Largest filtered value since the last update
    pub rolling_max: f32,
    /// Time of the last recomputation; `None` until detection starts
    pub last_update_ms: Option<Timestamp>,
}

impl ThresholdState {
    /// Initial state with the given trigger level
    pub fn new(initial_threshold: f32) -> Self {
        Self {
            dynamic_threshold: initial_threshold,
            rolling_min: f32::INFINITY,
            rolling_max: f32::NEG_INFINITY,
            last_update_ms: None,
        }
    }

    fn observe(&mut self, value: f32) {
        if value < self.rolling_min {
            self.rolling_min = value;
        }
        if value > self.rolling_max {
            self.rolling_max = value;
        }
    }

    fn reset_span(&mut self) {
        self.rolling_min = f32::INFINITY;
        self.rolling_max = f32::NEG_INFINITY;
    }
}

/// Sliding window of the most recent beat timestamps
///
/// ## Invariants
///
/// - Timestamps are strictly increasing
/// - `count() <= PEAK_WINDOW_CAPACITY`; the oldest beat is evicted on
///   overflow
#[derive(Debug, Clone)]
pub struct PeakWindow {
    timestamps: Deque<Timestamp, PEAK_WINDOW_CAPACITY>,
    /// Hysteresis latch: set on a beat, cleared when the signal releases
    pub armed: bool,
    /// Time of the most recent beat, kept across timeouts for the
    /// refractory check
    pub last_peak_ms: Option<Timestamp>,
}

impl Default for PeakWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl PeakWindow {
    /// Empty, disarmed window
    pub const fn new() -> Self {
        Self {
            timestamps: Deque::new(),
            armed: false,
            last_peak_ms: None,
        }
    }

    /// Append a beat, evicting the oldest when full.
    ///
    /// Returns `false` and leaves the window unchanged if `timestamp` is not
    /// after the newest stored beat.
    pub fn push(&mut self, timestamp: Timestamp) -> bool {
        if let Some(&newest) = self.timestamps.back() {
            if timestamp <= newest {
                return false;
            }
        }

        if self.timestamps.is_full() {
            self.timestamps.pop_front();
        }
        // Cannot fail: a slot was freed above if needed
        let _ = self.timestamps.push_back(timestamp);
        true
    }

    /// Number of stored beats
    pub fn count(&self) -> usize {
        self.timestamps.len()
    }

    /// Maximum number of stored beats
    pub const fn capacity(&self) -> usize {
        PEAK_WINDOW_CAPACITY
    }

    /// Whether no beats are stored
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Beats from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.timestamps.iter().copied()
    }

    /// Newest stored beat
    pub fn newest(&self) -> Option<Timestamp> {
        self.timestamps.back().copied()
    }

    /// Drop the stored beats. The latch and last beat time are kept.
    pub fn clear(&mut self) {
        self.timestamps.clear();
    }
}

impl PartialEq for PeakWindow {
    fn eq(&self, other: &Self) -> bool {
        self.armed == other.armed
            && self.last_peak_ms == other.last_peak_ms
            && self.iter().eq(other.iter())
    }
}

/// Stateless beat detector; all state lives in the window and threshold
/// passed to [`PeakDetector::detect`].
#[derive(Debug, Clone, Copy)]
pub struct PeakDetector {
    strategy: ThresholdStrategy,
    refractory_ms: u64,
    no_peak_timeout_ms: u64,
}

impl PeakDetector {
    /// Create a detector from its configuration
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            strategy: config.strategy,
            refractory_ms: config.refractory_ms,
            no_peak_timeout_ms: config.no_peak_timeout_ms,
        }
    }

    /// Threshold state matching this detector's policy
    pub fn initial_threshold(&self) -> ThresholdState {
        ThresholdState::new(self.strategy.initial_threshold())
    }

    /// Policy in use
    pub fn strategy(&self) -> ThresholdStrategy {
        self.strategy
    }

    /// Process one filtered sample; returns the beat timestamp if one was
    /// registered.
    pub fn detect(
        &self,
        filtered: f32,
        now_ms: Timestamp,
        window: &mut PeakWindow,
        threshold: &mut ThresholdState,
    ) -> Option<Timestamp> {
        self.update_threshold(filtered, now_ms, threshold);

        if let Some(last_peak) = window.last_peak_ms {
            if !window.is_empty() && elapsed_ms(last_peak, now_ms) > self.no_peak_timeout_ms {
                log_debug!("no beat for {} ms, discarding {} stored beats",
                    elapsed_ms(last_peak, now_ms), window.count());
                window.clear();
            }
        }

        let trigger = threshold.dynamic_threshold;

        if window.armed {
            if self.strategy.releases(filtered, trigger) {
                window.armed = false;
            }
            return None;
        }

        if filtered <= trigger {
            return None;
        }

        let refractory_elapsed = window
            .last_peak_ms
            .map_or(true, |last| elapsed_ms(last, now_ms) >= self.refractory_ms);
        if !refractory_elapsed {
            return None;
        }

        window.armed = true;
        window.last_peak_ms = Some(now_ms);
        window.push(now_ms);
        log_debug!("beat at {} ms (value {}, threshold {})", now_ms, filtered, trigger);

        Some(now_ms)
    }

    fn update_threshold(&self, filtered: f32, now_ms: Timestamp, threshold: &mut ThresholdState) {
        threshold.observe(filtered);

        let ThresholdStrategy::Adaptive { fraction, update_period_ms, initial_threshold, .. } = self.strategy
        else {
            return;
        };

        let Some(last_update) = threshold.last_update_ms else {
            threshold.last_update_ms = Some(now_ms);
            return;
        };

        if elapsed_ms(last_update, now_ms) < update_period_ms {
            return;
        }

        if threshold.rolling_min <= threshold.rolling_max {
            let span = threshold.rolling_max - threshold.rolling_min;
            // A span holding only the undershoot and baseline would put the
            // trigger below the baseline
            threshold.dynamic_threshold = (threshold.rolling_min + fraction * span).max(initial_threshold);
            log_trace!("threshold {} from span [{}, {}]",
                threshold.dynamic_threshold, threshold.rolling_min, threshold.rolling_max);
        }
        threshold.reset_span();
        threshold.last_update_ms = Some(now_ms);
    }
}
