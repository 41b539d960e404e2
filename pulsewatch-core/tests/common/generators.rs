//! Synthetic PPG waveforms
//!
//! Each pulse is a fast linear upstroke followed by a slow linear decay back
//! to the baseline, which is close enough to a systolic peak for the
//! conditioner and detector:
//!
//! ```text
//!        /\
//!       /  `-.
//!      /      `-.
//! ____/          `-.________
//!     ↑ start
//! ```

use pulsewatch_core::time::Timestamp;

/// Baseline plus a train of pulses
#[derive(Debug, Clone)]
pub struct PpgGenerator {
    /// DC level in ADC counts
    pub baseline: f32,
    /// Pulse height above the baseline
    pub amplitude: f32,
    /// Upstroke duration
    pub rise_ms: u64,
    /// Decay duration
    pub decay_ms: u64,
    /// Pulse start times
    pub pulses: Vec<Timestamp>,
}

impl PpgGenerator {
    /// Flat signal at `baseline`
    pub fn flat(baseline: f32) -> Self {
        Self {
            baseline,
            amplitude: 800.0,
            rise_ms: 40,
            decay_ms: 300,
            pulses: Vec::new(),
        }
    }

    /// `count` pulses `spacing_ms` apart starting at `first_ms`
    pub fn evenly_spaced(first_ms: Timestamp, spacing_ms: u64, count: usize) -> Self {
        let mut generator = Self::flat(2000.0);
        generator.pulses = (0..count as u64).map(|i| first_ms + i * spacing_ms).collect();
        generator
    }

    /// Raw sample at `t`
    pub fn value_at(&self, t: Timestamp) -> f32 {
        let mut value = self.baseline;
        for &start in &self.pulses {
            if t <= start {
                continue;
            }
            let since = (t - start) as f32;
            let rise = self.rise_ms as f32;
            let decay = self.decay_ms as f32;
            if since <= rise {
                value += self.amplitude * since / rise;
            } else if since < rise + decay {
                value += self.amplitude * (1.0 - (since - rise) / decay);
            }
        }
        value
    }
}
