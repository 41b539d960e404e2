//! Pipeline configuration
//!
//! One [`PipelineConfig`] is chosen at session construction and never
//! changes while the session runs. Every option has a default taken from
//! [`crate::constants`], so a partial configuration (for example one
//! deserialised from a short JSON document) is always complete.
//!
//! ```rust
//! use pulsewatch_core::{PipelineConfig, ThresholdStrategy};
//!
//! // Continuous monitoring with a slightly longer settle time
//! let config = PipelineConfig::continuous()
//!     .with_stabilization_ms(8000)
//!     .with_threshold_strategy(ThresholdStrategy::Hysteresis { arm: 40.0, release: 10.0 });
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.measurement_window_ms, None);
//! ```

use crate::{
    constants::{
        time::{
            DEFAULT_NO_PEAK_TIMEOUT_MS, DEFAULT_REFRACTORY_MS, DEFAULT_THRESHOLD_UPDATE_MS,
        },
        vitals::{
            DEFAULT_CONDITIONER_WINDOW, DEFAULT_HIGH_PASS_ALPHA, DEFAULT_HYSTERESIS_RATIO,
            DEFAULT_INITIAL_THRESHOLD, DEFAULT_LOW_PASS_BETA, DEFAULT_THRESHOLD_FRACTION,
            LEGACY_FIXED_THRESHOLD,
        },
        BPM_SMOOTHING_CAPACITY, BRADYCARDIA_BELOW_BPM, DEFAULT_MEASUREMENT_WINDOW_MS,
        DEFAULT_REPORT_INTERVAL_MS, DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_STABILIZATION_MS,
        FEVER_ABOVE_C, HYPOTHERMIA_BELOW_C, MAX_CONDITIONER_WINDOW, TACHYCARDIA_ABOVE_BPM,
    },
    detector::ThresholdStrategy,
    errors::{VitalsError, VitalsResult},
};

/// Signal conditioner settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// High-pass feedback coefficient α; `None` bypasses the stage
    pub high_pass_alpha: Option<f32>,
    /// Low-pass coefficient β; `None` bypasses the stage
    pub low_pass_beta: Option<f32>,
    /// Moving-average window W in samples
    pub window: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            high_pass_alpha: Some(DEFAULT_HIGH_PASS_ALPHA),
            low_pass_beta: Some(DEFAULT_LOW_PASS_BETA),
            window: DEFAULT_CONDITIONER_WINDOW,
        }
    }
}

/// Peak detector settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Threshold policy
    pub strategy: ThresholdStrategy,
    /// Minimum spacing between beats (ms)
    pub refractory_ms: u64,
    /// Silence after which the beat window is discarded (ms)
    pub no_peak_timeout_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            strategy: ThresholdStrategy::default(),
            refractory_ms: DEFAULT_REFRACTORY_MS,
            no_peak_timeout_ms: DEFAULT_NO_PEAK_TIMEOUT_MS,
        }
    }
}

/// Classification limits. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifierConfig {
    /// Non-zero BPM below this is bradycardia
    pub bradycardia_below_bpm: u32,
    /// BPM above this is tachycardia
    pub tachycardia_above_bpm: u32,
    /// Temperature below this is hypothermia (°C)
    pub hypothermia_below_c: f32,
    /// Temperature above this is fever (°C)
    pub fever_above_c: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            bradycardia_below_bpm: BRADYCARDIA_BELOW_BPM,
            tachycardia_above_bpm: TACHYCARDIA_ABOVE_BPM,
            hypothermia_below_c: HYPOTHERMIA_BELOW_C,
            fever_above_c: FEVER_ABOVE_C,
        }
    }
}

/// Complete pipeline configuration
///
/// The default 650 ms refractory period caps the detectable rate at 92 BPM,
/// so Tachycardia is never reported under the defaults: a faster pulse
/// registers every other beat and reads as half its rate. Lower
/// `detector.refractory_ms` with [`PipelineConfig::with_refractory_ms`]
/// when tachycardia has to be detected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Period of the sampling tick (ms)
    pub sample_interval_ms: u32,
    /// Period of classification and display refresh (ms)
    pub report_interval_ms: u32,
    /// Settle time before detection starts (ms)
    pub stabilization_ms: u64,
    /// Session length; `None` runs until stopped
    pub measurement_window_ms: Option<u64>,
    /// Number of raw BPM estimates averaged into the displayed value
    pub bpm_smoothing_window: usize,
    /// Signal conditioner
    pub filter: FilterConfig,
    /// Peak detector
    pub detector: DetectorConfig,
    /// Health classifier
    pub classifier: ClassifierConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            report_interval_ms: DEFAULT_REPORT_INTERVAL_MS,
            stabilization_ms: DEFAULT_STABILIZATION_MS,
            measurement_window_ms: Some(DEFAULT_MEASUREMENT_WINDOW_MS),
            bpm_smoothing_window: BPM_SMOOTHING_CAPACITY,
            filter: FilterConfig::default(),
            detector: DetectorConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Continuous monitoring: no measurement window, the session stays
    /// active until the caller stops it.
    pub fn continuous() -> Self {
        Self {
            measurement_window_ms: None,
            ..Self::default()
        }
    }

    /// The first firmware policy: moving average of raw ADC counts with a
    /// fixed trigger level and a 300 ms minimum beat spacing.
    pub fn legacy_fixed() -> Self {
        Self {
            filter: FilterConfig {
                high_pass_alpha: None,
                low_pass_beta: None,
                window: DEFAULT_CONDITIONER_WINDOW,
            },
            detector: DetectorConfig {
                strategy: ThresholdStrategy::Fixed { level: LEGACY_FIXED_THRESHOLD },
                refractory_ms: 300,
                no_peak_timeout_ms: DEFAULT_NO_PEAK_TIMEOUT_MS,
            },
            ..Self::default()
        }
    }

    /// Set the sampling period
    pub fn with_sample_interval_ms(mut self, interval_ms: u32) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Set the classification/display period
    pub fn with_report_interval_ms(mut self, interval_ms: u32) -> Self {
        self.report_interval_ms = interval_ms;
        self
    }

    /// Set the stabilisation period
    pub fn with_stabilization_ms(mut self, stabilization_ms: u64) -> Self {
        self.stabilization_ms = stabilization_ms;
        self
    }

    /// Set or clear the measurement window
    pub fn with_measurement_window_ms(mut self, window_ms: Option<u64>) -> Self {
        self.measurement_window_ms = window_ms;
        self
    }

    /// Set the conditioner moving-average window
    pub fn with_conditioner_window(mut self, window: usize) -> Self {
        self.filter.window = window;
        self
    }

    /// Set the high-pass and low-pass coefficients
    pub fn with_filter_coefficients(mut self, alpha: Option<f32>, beta: Option<f32>) -> Self {
        self.filter.high_pass_alpha = alpha;
        self.filter.low_pass_beta = beta;
        self
    }

    /// Set the threshold policy
    pub fn with_threshold_strategy(mut self, strategy: ThresholdStrategy) -> Self {
        self.detector.strategy = strategy;
        self
    }

    /// Set the refractory period
    pub fn with_refractory_ms(mut self, refractory_ms: u64) -> Self {
        self.detector.refractory_ms = refractory_ms;
        self
    }

    /// Set the no-peak timeout
    pub fn with_no_peak_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.detector.no_peak_timeout_ms = timeout_ms;
        self
    }

    /// Set the BPM smoothing window
    pub fn with_bpm_smoothing_window(mut self, window: usize) -> Self {
        self.bpm_smoothing_window = window;
        self
    }

    /// Set the classification limits
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Check every option against its accepted range
    pub fn validate(&self) -> VitalsResult<()> {
        if self.sample_interval_ms == 0 {
            return Err(invalid("sample_interval_ms", "must be non-zero"));
        }
        if self.report_interval_ms < self.sample_interval_ms {
            return Err(invalid("report_interval_ms", "shorter than the sampling interval"));
        }
        if let Some(window) = self.measurement_window_ms {
            if window <= self.stabilization_ms {
                return Err(invalid("measurement_window_ms", "ends before stabilisation"));
            }
        }
        if self.bpm_smoothing_window == 0 || self.bpm_smoothing_window > BPM_SMOOTHING_CAPACITY {
            return Err(invalid("bpm_smoothing_window", "outside 1..=5"));
        }

        self.validate_filter()?;
        self.validate_detector()?;

        let classifier = &self.classifier;
        if classifier.bradycardia_below_bpm > classifier.tachycardia_above_bpm {
            return Err(invalid("classifier", "bradycardia limit above tachycardia limit"));
        }
        if !(classifier.hypothermia_below_c <= classifier.fever_above_c) {
            return Err(invalid("classifier", "hypothermia limit above fever limit"));
        }

        Ok(())
    }

    fn validate_filter(&self) -> VitalsResult<()> {
        let filter = &self.filter;
        if filter.window == 0 || filter.window > MAX_CONDITIONER_WINDOW {
            return Err(invalid("filter.window", "outside 1..=10"));
        }
        if let Some(alpha) = filter.high_pass_alpha {
            if !(0.0..1.0).contains(&alpha) {
                return Err(invalid("filter.high_pass_alpha", "outside [0, 1)"));
            }
        }
        if let Some(beta) = filter.low_pass_beta {
            if !(beta > 0.0 && beta <= 1.0) {
                return Err(invalid("filter.low_pass_beta", "outside (0, 1]"));
            }
        }
        Ok(())
    }

    fn validate_detector(&self) -> VitalsResult<()> {
        let detector = &self.detector;
        if detector.refractory_ms == 0 {
            return Err(invalid("detector.refractory_ms", "must be non-zero"));
        }
        if detector.no_peak_timeout_ms <= detector.refractory_ms {
            return Err(invalid("detector.no_peak_timeout_ms", "not longer than the refractory period"));
        }

        match detector.strategy {
            ThresholdStrategy::Fixed { level } => {
                if !level.is_finite() {
                    return Err(invalid("detector.strategy", "fixed level is not finite"));
                }
            }
            ThresholdStrategy::Hysteresis { arm, release } => {
                if !(arm.is_finite() && release.is_finite()) || release > arm {
                    return Err(invalid("detector.strategy", "release level above arm level"));
                }
            }
            ThresholdStrategy::Adaptive { fraction, hysteresis_ratio, update_period_ms, initial_threshold } => {
                if !(fraction > 0.0 && fraction < 1.0) {
                    return Err(invalid("detector.strategy", "fraction outside (0, 1)"));
                }
                if !(hysteresis_ratio > 0.0 && hysteresis_ratio <= 1.0) {
                    return Err(invalid("detector.strategy", "hysteresis ratio outside (0, 1]"));
                }
                if update_period_ms == 0 {
                    return Err(invalid("detector.strategy", "update period must be non-zero"));
                }
                if !initial_threshold.is_finite() {
                    return Err(invalid("detector.strategy", "initial threshold is not finite"));
                }
            }
        }
        Ok(())
    }
}

/// Adaptive defaults, shared by `ThresholdStrategy::default`
pub(crate) const fn default_adaptive() -> ThresholdStrategy {
    ThresholdStrategy::Adaptive {
        fraction: DEFAULT_THRESHOLD_FRACTION,
        hysteresis_ratio: DEFAULT_HYSTERESIS_RATIO,
        update_period_ms: DEFAULT_THRESHOLD_UPDATE_MS,
        initial_threshold: DEFAULT_INITIAL_THRESHOLD,
    }
}

fn invalid(field: &'static str, reason: &'static str) -> VitalsError {
    VitalsError::InvalidConfig { field, reason }
}
