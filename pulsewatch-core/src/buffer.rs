//! Fixed-Capacity Running-Sum Average
//!
//! ## Overview
//!
//! Both the signal conditioner (moving average over W samples) and the BPM
//! estimator (average over the last 5 estimates) need the same primitive:
//! a circular buffer that keeps a running sum so the mean costs O(1) per
//! sample regardless of the window length.
//!
//! ## Fixed-Point Sum
//!
//! A float running sum accumulates rounding error: after millions of
//! add/subtract pairs at 500 Hz it no longer equals the sum of the stored
//! values. Here each value is quantised once to `I48F16` when it enters the
//! buffer and the sum is kept in the same format, so subtracting an evicted
//! value removes exactly what was added. Wrapping arithmetic keeps that
//! property even if an intermediate sum overflows.
//!
//! ```text
//! RunningAverage<10> with window = 5:
//! ┌─────┬─────┬─────┬─────┬─────┬ ─ ─ ┬ ─ ─ ┐
//! │  0  │  1  │  2  │  3  │  4  │ n/a │ n/a │  ← only `window` slots used
//! └─────┴─────┴─────┴─────┴─────┴ ─ ─ ┴ ─ ─ ┘
//!          ↑
//!          write_pos (oldest slot once filled)
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use pulsewatch_core::buffer::RunningAverage;
//!
//! let mut avg: RunningAverage<5> = RunningAverage::new(3);
//! avg.push(1.0);
//! avg.push(2.0);
//! assert!(!avg.is_filled());
//! avg.push(3.0);
//! assert_eq!(avg.window_mean(), Some(2.0));
//!
//! // Fourth value evicts the first
//! avg.push(6.0);
//! assert_eq!(avg.window_mean(), Some(11.0 / 3.0));
//! ```

use fixed::types::I48F16;

/// Circular buffer of up to `N` values with an exact running sum
///
/// The runtime `window` (1..=N) selects how many slots participate; the
/// remaining capacity is unused. This lets one type serve every configured
/// window size without allocation.
#[derive(Debug, Clone)]
pub struct RunningAverage<const N: usize> {
    /// Quantised values, valid in `[0, len)` modulo `window`
    slots: [I48F16; N],

    /// Active window length, `1 <= window <= N`
    window: usize,

    /// Slot the next push overwrites
    write_pos: usize,

    /// Number of valid slots, saturates at `window`
    len: usize,

    /// Sum of the valid slots
    sum: I48F16,
}

impl<const N: usize> RunningAverage<N> {
    /// Create an empty average over `window` values, clamped to `1..=N`
    pub fn new(window: usize) -> Self {
        Self {
            slots: [I48F16::ZERO; N],
            window: window.clamp(1, N),
            write_pos: 0,
            len: 0,
            sum: I48F16::ZERO,
        }
    }

    /// Add a value, evicting the oldest once the window is full.
    ///
    /// Non-finite values are rejected and leave the buffer untouched.
    pub fn push(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }

        let quantised = I48F16::saturating_from_num(value);

        if self.len == self.window {
            self.sum = self.sum.wrapping_sub(self.slots[self.write_pos]);
        } else {
            self.len += 1;
        }

        self.slots[self.write_pos] = quantised;
        self.sum = self.sum.wrapping_add(quantised);
        self.write_pos = (self.write_pos + 1) % self.window;
        true
    }

    /// Mean of the stored values, `None` while empty
    pub fn mean(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        Some(self.sum.to_num::<f32>() / self.len as f32)
    }

    /// Mean over the full window, `None` until `window` values were pushed
    pub fn window_mean(&self) -> Option<f32> {
        if self.is_filled() {
            self.mean()
        } else {
            None
        }
    }

    /// Whether `window` values have been pushed since the last clear
    pub fn is_filled(&self) -> bool {
        self.len == self.window
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured window length
    pub fn window(&self) -> usize {
        self.window
    }

    /// Forget every stored value; the window length is kept
    pub fn clear(&mut self) {
        self.slots = [I48F16::ZERO; N];
        self.write_pos = 0;
        self.len = 0;
        self.sum = I48F16::ZERO;
    }
}

impl<const N: usize> PartialEq for RunningAverage<N> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
            && self.window == other.window
            && self.write_pos == other.write_pos
            && self.len == other.len
            && self.sum == other.sum
    }
}
