//! BPM Estimator
//!
//! Converts the beat window into a heart rate. The instantaneous estimate
//! uses the mean inter-beat interval of the stored beats; the displayed
//! value is a running average of the last few non-zero estimates.
//!
//! BPM 0 is a sentinel for "insufficient data" (fewer than two beats, or a
//! zero-length interval). It is never averaged into the smoothed value.

use crate::{
    buffer::RunningAverage,
    constants::{BPM_SMOOTHING_CAPACITY, MS_PER_MINUTE},
    detector::PeakWindow,
};

/// Instantaneous BPM from the beats in `window`.
///
/// Returns 0 when fewer than two beats are stored or the mean interval
/// rounds down to zero.
///
/// ```rust
/// use pulsewatch_core::{detector::PeakWindow, estimator::estimate};
///
/// let mut window = PeakWindow::new();
/// for t in [0, 800, 1600, 2400, 3200] {
///     window.push(t);
/// }
/// assert_eq!(estimate(&window), 75);
/// ```
pub fn estimate(window: &PeakWindow) -> u32 {
    let count = window.count();
    if count < 2 {
        return 0;
    }

    let mut beats = window.iter();
    let Some(mut previous) = beats.next() else {
        return 0;
    };
    let mut total_interval_ms: u64 = 0;
    for beat in beats {
        total_interval_ms += beat.saturating_sub(previous);
        previous = beat;
    }

    let avg_interval_ms = total_interval_ms / (count as u64 - 1);
    if avg_interval_ms == 0 {
        return 0;
    }

    (MS_PER_MINUTE as u64 / avg_interval_ms) as u32
}

/// Estimator state
#[derive(Debug, Clone, PartialEq)]
pub struct BpmState {
    /// Most recent instantaneous estimate (0 = insufficient data)
    pub raw_bpm: u32,
    /// Average of recent non-zero estimates
    pub average: RunningAverage<BPM_SMOOTHING_CAPACITY>,
    /// Rounded average; 0 until the first non-zero estimate
    pub smoothed_bpm: u32,
}

impl BpmState {
    /// Initial state averaging over `window` estimates
    pub fn new(window: usize) -> Self {
        Self {
            raw_bpm: 0,
            average: RunningAverage::new(window),
            smoothed_bpm: 0,
        }
    }
}

/// Instantaneous and smoothed BPM tracking
#[derive(Debug, Clone)]
pub struct BpmEstimator {
    smoothing_window: usize,
    state: BpmState,
}

impl BpmEstimator {
    /// Create an estimator smoothing over `smoothing_window` estimates
    pub fn new(smoothing_window: usize) -> Self {
        Self {
            smoothing_window,
            state: BpmState::new(smoothing_window),
        }
    }

    /// Re-estimate from `window` and fold a non-zero result into the
    /// smoothed value. Returns the instantaneous estimate.
    pub fn update(&mut self, window: &PeakWindow) -> u32 {
        let raw_bpm = estimate(window);
        self.state.raw_bpm = raw_bpm;

        if raw_bpm != 0 {
            self.state.average.push(raw_bpm as f32);
            if let Some(mean) = self.state.average.mean() {
                self.state.smoothed_bpm = libm::roundf(mean) as u32;
            }
        }

        raw_bpm
    }

    /// Value shown to the user and classified: the smoothed BPM, or 0 when
    /// the latest estimate had insufficient data.
    pub fn surfaced_bpm(&self) -> u32 {
        if self.state.raw_bpm == 0 {
            0
        } else {
            self.state.smoothed_bpm
        }
    }

    /// Current state
    pub fn state(&self) -> &BpmState {
        &self.state
    }

    /// Forget every estimate
    pub fn reset(&mut self) {
        self.state = BpmState::new(self.smoothing_window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_of(beats: &[u64]) -> PeakWindow {
        let mut window = PeakWindow::new();
        for &t in beats {
            window.push(t);
        }
        window
    }

    #[test]
    fn insufficient_beats_is_zero() {
        assert_eq!(estimate(&window_of(&[])), 0);
        assert_eq!(estimate(&window_of(&[1234])), 0);
    }

    #[test]
    fn evenly_spaced_beats() {
        assert_eq!(estimate(&window_of(&[0, 800, 1600, 2400, 3200])), 75);
        assert_eq!(estimate(&window_of(&[5000, 5650])), 92);
        assert_eq!(estimate(&window_of(&[0, 1000])), 60);
    }

    #[test]
    fn uses_mean_interval() {
        // Intervals 600 and 1000 → mean 800 → 75
        assert_eq!(estimate(&window_of(&[0, 600, 1600])), 75);
    }

    #[test]
    fn one_millisecond_interval() {
        assert_eq!(estimate(&window_of(&[1, 2])), 60_000);
    }

    #[test]
    fn smoothing_ignores_zero_estimates() {
        let mut estimator = BpmEstimator::new(5);

        assert_eq!(estimator.update(&window_of(&[0])), 0);
        assert_eq!(estimator.surfaced_bpm(), 0);
        assert!(estimator.state().average.is_empty());

        estimator.update(&window_of(&[0, 800]));
        assert_eq!(estimator.surfaced_bpm(), 75);

        estimator.update(&window_of(&[0, 800, 1400]));
        // raw = 60000 / 700 = 85 → mean(75, 85) = 80
        assert_eq!(estimator.surfaced_bpm(), 80);

        estimator.update(&window_of(&[]));
        assert_eq!(estimator.surfaced_bpm(), 0, "zero estimate surfaces as no reading");
        assert_eq!(estimator.state().smoothed_bpm, 80, "but does not disturb the average");
    }

    #[test]
    fn smoothing_window_evicts() {
        let mut estimator = BpmEstimator::new(2);
        estimator.update(&window_of(&[0, 1000]));      // 60
        estimator.update(&window_of(&[0, 500]));       // 120
        assert_eq!(estimator.surfaced_bpm(), 90);
        estimator.update(&window_of(&[0, 600]));       // 100
        assert_eq!(estimator.surfaced_bpm(), 110);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut estimator = BpmEstimator::new(5);
        estimator.update(&window_of(&[0, 700, 1400]));
        estimator.reset();
        assert_eq!(estimator.state(), &BpmState::new(5));
    }
}
