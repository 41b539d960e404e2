//! PPG Signal Conditioner
//!
//! Turns the raw sample stream into a denoised stream centred on zero.
//! Three stages run in a fixed order on every tick:
//!
//! ```text
//! raw ──► high-pass ──► low-pass ──► moving average ──► filtered
//!         (DC drift)    (HF noise)   (W samples)
//! ```
//!
//! 1. High-pass: `hp = raw - prev_raw + α·prev_hp`
//! 2. Low-pass: `lp = β·hp + (1-β)·prev_lp`
//! 3. Moving average over W samples; until W samples have been seen the
//!    low-pass value is passed through unchanged.
//!
//! The conditioner runs during stabilisation as well: the filters need that
//! time to settle before peak detection starts.

use crate::{
    buffer::RunningAverage,
    config::FilterConfig,
    constants::MAX_CONDITIONER_WINDOW,
    errors::SensorError,
};

/// All mutable conditioner state
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Previous raw input; `None` until the first sample primes the stage
    pub prev_raw: Option<f32>,
    /// Previous high-pass output
    pub prev_high_pass: f32,
    /// Previous low-pass output
    pub prev_low_pass: f32,
    /// Moving-average stage
    pub average: RunningAverage<MAX_CONDITIONER_WINDOW>,
}

impl FilterState {
    /// Initial state for a window of `window` samples
    pub fn new(window: usize) -> Self {
        Self {
            prev_raw: None,
            prev_high_pass: 0.0,
            prev_low_pass: 0.0,
            average: RunningAverage::new(window),
        }
    }
}

/// Three-stage PPG conditioner. O(1) per sample, no allocation.
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    config: FilterConfig,
    state: FilterState,
}

impl SignalConditioner {
    /// Create a conditioner
    pub fn new(config: FilterConfig) -> Self {
        Self {
            state: FilterState::new(config.window),
            config,
        }
    }

    /// Condition one raw sample.
    ///
    /// Rejects non-finite input with [`SensorError::InvalidSample`] without
    /// touching the filter state.
    pub fn condition(&mut self, raw: f32) -> Result<f32, SensorError> {
        if !raw.is_finite() {
            return Err(SensorError::InvalidSample { reason: "non-finite sample" });
        }

        let high_pass = self.high_pass(raw);
        let low_pass = self.low_pass(high_pass);

        let average = &mut self.state.average;
        average.push(low_pass);
        Ok(average.window_mean().unwrap_or(low_pass))
    }

    fn high_pass(&mut self, raw: f32) -> f32 {
        let Some(alpha) = self.config.high_pass_alpha else {
            return raw;
        };

        // The first sample primes the stage; without it the output would
        // start with a step of the full DC level.
        let prev_raw = self.state.prev_raw.unwrap_or(raw);
        let output = raw - prev_raw + alpha * self.state.prev_high_pass;

        self.state.prev_raw = Some(raw);
        self.state.prev_high_pass = output;
        output
    }

    fn low_pass(&mut self, input: f32) -> f32 {
        let Some(beta) = self.config.low_pass_beta else {
            return input;
        };

        let output = beta * input + (1.0 - beta) * self.state.prev_low_pass;
        self.state.prev_low_pass = output;
        output
    }

    /// Whether the moving average has a full window
    pub fn is_settled(&self) -> bool {
        self.state.average.is_filled()
    }

    /// Current state, for inspection and tests
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Configuration in use
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        self.state = FilterState::new(self.config.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low_pass_only(config: FilterConfig, raw: &[f32]) -> std::vec::Vec<f32> {
        // Reference high-pass + low-pass chain without the moving average
        let mut prev_raw: Option<f32> = None;
        let mut prev_hp = 0.0f32;
        let mut prev_lp = 0.0f32;
        raw.iter()
            .map(|&x| {
                let hp = match config.high_pass_alpha {
                    Some(alpha) => {
                        let hp = x - prev_raw.unwrap_or(x) + alpha * prev_hp;
                        prev_raw = Some(x);
                        prev_hp = hp;
                        hp
                    }
                    None => x,
                };
                match config.low_pass_beta {
                    Some(beta) => {
                        let lp = beta * hp + (1.0 - beta) * prev_lp;
                        prev_lp = lp;
                        lp
                    }
                    None => hp,
                }
            })
            .collect()
    }

    #[test]
    fn passthrough_before_window_fills() {
        let config = FilterConfig::default();
        let raw = [2000.0, 2010.0, 2030.0, 2020.0];
        let expected = low_pass_only(config, &raw);

        let mut conditioner = SignalConditioner::new(config);
        for (x, want) in raw.iter().zip(expected) {
            assert_eq!(conditioner.condition(*x).unwrap(), want);
        }
        assert!(!conditioner.is_settled());
    }

    #[test]
    fn constant_input_stays_at_zero() {
        let mut conditioner = SignalConditioner::new(FilterConfig::default());
        for _ in 0..100 {
            assert_eq!(conditioner.condition(2048.0).unwrap(), 0.0);
        }
        assert!(conditioner.is_settled());
    }

    #[test]
    fn bypassed_stages_average_raw_counts() {
        let config = FilterConfig { high_pass_alpha: None, low_pass_beta: None, window: 5 };
        let mut conditioner = SignalConditioner::new(config);

        for x in [10.0, 20.0, 30.0, 40.0] {
            assert_eq!(conditioner.condition(x).unwrap(), x);
        }
        assert_eq!(conditioner.condition(50.0).unwrap(), 30.0);
        assert_eq!(conditioner.condition(60.0).unwrap(), 40.0);
    }

    #[test]
    fn removes_baseline_step() {
        let mut conditioner = SignalConditioner::new(FilterConfig::default());
        for _ in 0..50 {
            conditioner.condition(1000.0).unwrap();
        }
        // A permanent step decays back towards zero through the high-pass
        let mut last = 0.0;
        for _ in 0..1000 {
            last = conditioner.condition(1500.0).unwrap();
        }
        assert!(last.abs() < 1.0, "residual {}", last);
    }

    #[test]
    fn rejects_nan_without_state_change() {
        let mut conditioner = SignalConditioner::new(FilterConfig::default());
        conditioner.condition(100.0).unwrap();
        let before = conditioner.state().clone();

        assert!(conditioner.condition(f32::NAN).is_err());
        assert_eq!(conditioner.state(), &before);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut conditioner = SignalConditioner::new(FilterConfig::default());
        for x in [1.0, 50.0, 3.0, 900.0, 2.0, 7.0, 8.0] {
            conditioner.condition(x).unwrap();
        }
        conditioner.reset();
        assert_eq!(conditioner.state(), &FilterState::new(5));
    }
}
