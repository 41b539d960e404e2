//! Measurement Session
//!
//! ## Overview
//!
//! A [`Session`] owns every piece of pipeline state: conditioner, detector
//! threshold, beat window, BPM estimator, classifier and clock. It is an
//! explicit value passed by `&mut`; there is no module-level state, so two
//! sessions never interfere and a test can build as many as it likes.
//!
//! ## Lifecycle
//!
//! ```text
//!   tick ──► Stabilizing ──(stabilization_ms)──► Active ──(window)──► Finished
//!                │                                  │                    │
//!           filters only                  detect + estimate        terminal until
//!                                                                      reset()
//! ```
//!
//! - **Stabilizing**: the conditioner runs so its filters settle; no beats
//!   are detected and reports carry a placeholder.
//! - **Active**: beats are detected and BPM is estimated every tick.
//! - **Finished**: reached when a measurement window is configured and has
//!   elapsed. The closing tick produces a final report; later ticks are
//!   ignored.
//!
//! ## Tick Contract
//!
//! [`Session::tick`] is called once per sampling period with the sensor
//! result for that period. It never fails: an adapter error holds the last
//! filtered value and is counted in [`SessionStats`]. Reports are built on
//! demand with [`Session::report`] when [`TickOutcome::report_due`] says so,
//! which keeps classification and display off the per-sample path.
//!
//! ```rust
//! use pulsewatch_core::{PipelineConfig, Session, SessionPhase};
//!
//! let mut session = Session::new(PipelineConfig::default())?;
//! let outcome = session.tick(0, Ok(2048.0));
//! assert_eq!(outcome.phase, SessionPhase::Stabilizing);
//!
//! let outcome = session.tick(5000, Ok(2048.0));
//! assert_eq!(outcome.phase, SessionPhase::Active);
//! # Ok::<(), pulsewatch_core::VitalsError>(())
//! ```

use crate::{
    classifier::{ClassificationResult, HealthClassifier, RawTemperature},
    conditioner::SignalConditioner,
    config::PipelineConfig,
    constants::time::STABILIZATION_LOG_INTERVAL_MS,
    detector::{PeakDetector, PeakWindow, ThresholdState},
    errors::{SensorError, VitalsResult},
    estimator::BpmEstimator,
    time::{elapsed_ms, Sample, Timestamp},
};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionPhase {
    /// Filters settling, detection suppressed
    Stabilizing,
    /// Detecting beats and estimating BPM
    Active,
    /// Measurement window elapsed
    Finished,
}

/// Elapsed time and phase gating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    /// Timestamp of the first tick; `None` before it
    pub started_at_ms: Option<Timestamp>,
    /// Time since the first tick
    pub elapsed_ms: u64,
    /// Detection starts once `elapsed_ms` reaches this
    pub stabilization_deadline_ms: u64,
    /// Session ends once `elapsed_ms` reaches this; `None` runs forever
    pub measurement_deadline_ms: Option<u64>,
    /// Cleared when the measurement window closes
    pub active: bool,
}

impl SessionClock {
    /// Clock that has not seen a tick yet
    pub const fn new(stabilization_deadline_ms: u64, measurement_deadline_ms: Option<u64>) -> Self {
        Self {
            started_at_ms: None,
            elapsed_ms: 0,
            stabilization_deadline_ms,
            measurement_deadline_ms,
            active: true,
        }
    }

    /// Move to `now_ms`. The first call fixes the session origin.
    ///
    /// Has no effect once the session has finished.
    pub fn advance(&mut self, now_ms: Timestamp) -> u64 {
        if !self.active {
            return self.elapsed_ms;
        }

        let started_at = *self.started_at_ms.get_or_insert(now_ms);
        self.elapsed_ms = elapsed_ms(started_at, now_ms);

        if let Some(deadline) = self.measurement_deadline_ms {
            if self.elapsed_ms >= deadline {
                self.active = false;
            }
        }
        self.elapsed_ms
    }

    /// Phase at the current elapsed time
    pub fn phase(&self) -> SessionPhase {
        if !self.active {
            SessionPhase::Finished
        } else if self.elapsed_ms < self.stabilization_deadline_ms {
            SessionPhase::Stabilizing
        } else {
            SessionPhase::Active
        }
    }
}

/// Session counters
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SessionStats {
    /// Ticks processed (ticks after the session finished are not counted)
    pub ticks: u32,
    /// Beats registered by the detector
    pub beats: u32,
    /// Ticks whose sample was unusable
    pub adapter_faults: u32,
    /// Beat windows discarded after the no-peak timeout
    pub windows_cleared: u32,
    /// Reports built
    pub reports: u32,
    /// Most recent adapter failure
    #[cfg_attr(feature = "serde", serde(skip))]
    pub last_fault: Option<SensorError>,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Phase after the tick
    pub phase: SessionPhase,
    /// Beat registered on this tick
    pub beat: Option<Timestamp>,
    /// Filtered value used on this tick (held on adapter faults)
    pub filtered: f32,
    /// A report should be built and displayed now
    pub report_due: bool,
}

/// Snapshot handed to the display at the report cadence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VitalsReport {
    /// Phase when the report was built
    pub phase: SessionPhase,
    /// Surfaced BPM; 0 means no reading
    pub bpm: u32,
    /// Categories for `bpm` and the latest temperature
    pub classification: ClassificationResult,
    /// Latest temperature reading (°C)
    pub temperature_c: Option<f32>,
    /// Closing report of a finished measurement window
    pub is_final: bool,
    /// Latest filtered sample
    pub filtered: f32,
    /// Time since the first tick
    pub elapsed_ms: u64,
}

/// One measurement session
#[derive(Debug, Clone)]
pub struct Session {
    config: PipelineConfig,
    conditioner: SignalConditioner,
    detector: PeakDetector,
    window: PeakWindow,
    threshold: ThresholdState,
    estimator: BpmEstimator,
    classifier: HealthClassifier,
    clock: SessionClock,
    stats: SessionStats,
    last_filtered: f32,
    last_temperature_c: Option<f32>,
    last_report_ms: Option<Timestamp>,
    next_progress_log_ms: u64,
}

impl Session {
    /// Validate `config` and build a session in its initial state
    pub fn new(config: PipelineConfig) -> VitalsResult<Self> {
        config.validate()?;

        let detector = PeakDetector::new(&config.detector);
        Ok(Self {
            conditioner: SignalConditioner::new(config.filter),
            threshold: detector.initial_threshold(),
            detector,
            window: PeakWindow::new(),
            estimator: BpmEstimator::new(config.bpm_smoothing_window),
            classifier: HealthClassifier::new(config.classifier),
            clock: SessionClock::new(config.stabilization_ms, config.measurement_window_ms),
            stats: SessionStats::default(),
            last_filtered: 0.0,
            last_temperature_c: None,
            last_report_ms: None,
            next_progress_log_ms: 0,
            config,
        })
    }

    /// Process one sampling period.
    ///
    /// `raw` is the sensor result for this period; an `Err` is counted and
    /// the previous filtered value is reused.
    pub fn tick(&mut self, now_ms: Timestamp, raw: Result<f32, SensorError>) -> TickOutcome {
        let previous = self.clock.phase();
        if previous == SessionPhase::Finished {
            return TickOutcome {
                phase: SessionPhase::Finished,
                beat: None,
                filtered: self.last_filtered,
                report_due: false,
            };
        }

        if self.clock.started_at_ms.is_none() {
            log_info!("session started at {} ms", now_ms);
        }
        let elapsed = self.clock.advance(now_ms);
        self.stats.ticks = self.stats.ticks.saturating_add(1);

        let filtered = self.condition(raw);
        let phase = self.clock.phase();

        let mut beat = None;
        match phase {
            SessionPhase::Stabilizing => self.log_progress(elapsed),
            SessionPhase::Active => {
                if previous == SessionPhase::Stabilizing {
                    log_info!("stabilisation complete after {} ms, detection started", elapsed);
                }
                beat = self.detect(filtered, now_ms);
            }
            SessionPhase::Finished => {
                log_info!("measurement window closed after {} ms, final BPM {}",
                    elapsed, self.estimator.surfaced_bpm());
            }
        }

        let report_due = phase == SessionPhase::Finished || self.take_report_slot(now_ms);
        TickOutcome { phase, beat, filtered, report_due }
    }

    /// [`Session::tick`] for a sample that was read successfully
    pub fn tick_sample(&mut self, sample: Sample) -> TickOutcome {
        self.tick(sample.timestamp_ms, Ok(sample.value))
    }

    /// Classify the current state and build a report.
    ///
    /// `temperature` replaces the stored reading when present; a failed read
    /// should pass `None` so the previous value is kept.
    pub fn report(&mut self, temperature: Option<RawTemperature>) -> VitalsReport {
        if let Some(raw) = temperature {
            self.last_temperature_c = Some(raw.celsius());
        }

        let phase = self.clock.phase();
        let bpm = match phase {
            SessionPhase::Stabilizing => 0,
            SessionPhase::Active | SessionPhase::Finished => self.estimator.surfaced_bpm(),
        };
        self.stats.reports = self.stats.reports.saturating_add(1);

        VitalsReport {
            phase,
            bpm,
            classification: self.classifier.classify(bpm, self.last_temperature_c),
            temperature_c: self.last_temperature_c,
            is_final: phase == SessionPhase::Finished,
            filtered: self.last_filtered,
            elapsed_ms: self.clock.elapsed_ms,
        }
    }

    /// Return every owned state to its initial value. The configuration is
    /// kept.
    pub fn reset(&mut self) {
        self.conditioner.reset();
        self.window = PeakWindow::new();
        self.threshold = self.detector.initial_threshold();
        self.estimator.reset();
        self.clock = SessionClock::new(self.config.stabilization_ms, self.config.measurement_window_ms);
        self.stats = SessionStats::default();
        self.last_filtered = 0.0;
        self.last_temperature_c = None;
        self.last_report_ms = None;
        self.next_progress_log_ms = 0;
        log_debug!("session reset");
    }

    fn condition(&mut self, raw: Result<f32, SensorError>) -> f32 {
        match raw.and_then(|value| self.conditioner.condition(value)) {
            Ok(filtered) => {
                self.last_filtered = filtered;
                filtered
            }
            Err(error) => {
                self.stats.adapter_faults = self.stats.adapter_faults.saturating_add(1);
                self.stats.last_fault = Some(error);
                log_warn!("sample unavailable ({}), holding {}", error, self.last_filtered);
                self.last_filtered
            }
        }
    }

    fn detect(&mut self, filtered: f32, now_ms: Timestamp) -> Option<Timestamp> {
        let stored_before = self.window.count();
        let beat = self.detector.detect(filtered, now_ms, &mut self.window, &mut self.threshold);

        // A timeout leaves the window empty, or holding only this tick's beat
        let cleared = stored_before > 0 && self.window.count() == usize::from(beat.is_some());
        if cleared {
            self.estimator.reset();
            self.stats.windows_cleared = self.stats.windows_cleared.saturating_add(1);
        }

        if beat.is_some() {
            self.stats.beats = self.stats.beats.saturating_add(1);
            self.estimator.update(&self.window);
            log_debug!("raw BPM {}, smoothed {}",
                self.estimator.state().raw_bpm, self.estimator.state().smoothed_bpm);
        }
        beat
    }

    fn take_report_slot(&mut self, now_ms: Timestamp) -> bool {
        let Some(since) = self.last_report_ms.or(self.clock.started_at_ms) else {
            return false;
        };
        if elapsed_ms(since, now_ms) < u64::from(self.config.report_interval_ms) {
            return false;
        }
        self.last_report_ms = Some(now_ms);
        true
    }

    fn log_progress(&mut self, elapsed: u64) {
        if elapsed < self.next_progress_log_ms {
            return;
        }
        log_info!("stabilising: {} / {} ms", elapsed, self.clock.stabilization_deadline_ms);
        self.next_progress_log_ms = elapsed + STABILIZATION_LOG_INTERVAL_MS;
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.clock.phase()
    }

    /// Surfaced BPM (0 = no reading)
    pub fn bpm(&self) -> u32 {
        self.estimator.surfaced_bpm()
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Counters
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Session clock
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Beat window
    pub fn window(&self) -> &PeakWindow {
        &self.window
    }

    /// Detector threshold state
    pub fn threshold(&self) -> &ThresholdState {
        &self.threshold
    }

    /// Signal conditioner
    pub fn conditioner(&self) -> &SignalConditioner {
        &self.conditioner
    }

    /// BPM estimator
    pub fn estimator(&self) -> &BpmEstimator {
        &self.estimator
    }

    /// Latest filtered value
    pub fn last_filtered(&self) -> f32 {
        self.last_filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classifier::HeartRateCategory,
        conditioner::FilterState,
        detector::ThresholdStrategy,
        estimator::BpmState,
    };

    /// Conditioner bypassed so the detector sees raw values
    fn passthrough_config() -> PipelineConfig {
        PipelineConfig::default()
            .with_filter_coefficients(None, None)
            .with_conditioner_window(1)
            .with_threshold_strategy(ThresholdStrategy::Fixed { level: 10.0 })
            .with_stabilization_ms(1000)
            .with_measurement_window_ms(Some(10_000))
    }

    fn run_pulses(session: &mut Session, beats: &[u64], until: u64) {
        for t in (0..=until).step_by(2) {
            let value = if beats.iter().any(|&b| t >= b && t < b + 50) { 20.0 } else { 0.0 };
            session.tick(t, Ok(value));
        }
    }

    #[test]
    fn clock_phases() {
        let mut clock = SessionClock::new(5000, Some(30_000));
        assert_eq!(clock.phase(), SessionPhase::Stabilizing);

        clock.advance(100);
        assert_eq!(clock.elapsed_ms, 0);
        clock.advance(5099);
        assert_eq!(clock.phase(), SessionPhase::Stabilizing);
        clock.advance(5100);
        assert_eq!(clock.phase(), SessionPhase::Active);
        clock.advance(30_100);
        assert_eq!(clock.phase(), SessionPhase::Finished);

        // Terminal
        clock.advance(40_000);
        assert_eq!(clock.elapsed_ms, 30_000);
        assert_eq!(clock.phase(), SessionPhase::Finished);
    }

    #[test]
    fn unbounded_clock_never_finishes() {
        let mut clock = SessionClock::new(0, None);
        clock.advance(0);
        clock.advance(u64::MAX);
        assert_eq!(clock.phase(), SessionPhase::Active);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PipelineConfig::default().with_sample_interval_ms(0);
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn no_detection_during_stabilisation() {
        let mut session = Session::new(passthrough_config()).unwrap();
        run_pulses(&mut session, &[100, 800], 999);
        assert_eq!(session.stats().beats, 0);
        assert!(session.window().is_empty());
        assert_eq!(session.report(None).bpm, 0);
    }

    #[test]
    fn detects_and_estimates_after_stabilisation() {
        let mut session = Session::new(passthrough_config()).unwrap();
        run_pulses(&mut session, &[1000, 1800, 2600, 3400, 4200], 4500);

        assert_eq!(session.stats().beats, 5);
        assert_eq!(session.bpm(), 75);
        let report = session.report(None);
        assert_eq!(report.classification.heart_rate, HeartRateCategory::Normal);
        assert!(!report.is_final);
    }

    #[test]
    fn adapter_fault_holds_filtered_value() {
        let mut session = Session::new(passthrough_config()).unwrap();
        session.tick(0, Ok(7.0));
        let outcome = session.tick(2, Err(SensorError::Timeout));
        assert_eq!(outcome.filtered, 7.0);
        let outcome = session.tick(4, Ok(f32::NAN));
        assert_eq!(outcome.filtered, 7.0);

        assert_eq!(session.stats().adapter_faults, 2);
        assert!(matches!(session.stats().last_fault, Some(SensorError::InvalidSample { .. })));
        assert_eq!(session.stats().ticks, 3);
    }

    #[test]
    fn timeout_resets_smoothing() {
        let mut session = Session::new(passthrough_config()).unwrap();
        run_pulses(&mut session, &[1000, 1800, 2600], 8000);

        assert_eq!(session.stats().beats, 3);
        assert_eq!(session.stats().windows_cleared, 1);
        assert!(session.window().is_empty());
        assert_eq!(session.estimator().state(), &BpmState::new(5));
        assert_eq!(session.bpm(), 0);
    }

    #[test]
    fn report_cadence() {
        let mut session = Session::new(passthrough_config()).unwrap();
        let due: u32 = (0..=9000u64)
            .step_by(2)
            .map(|t| session.tick(t, Ok(0.0)).report_due as u32)
            .sum();
        // 3000, 6000 and 9000 ms
        assert_eq!(due, 3);
    }

    #[test]
    fn finishes_with_final_report() {
        let mut session = Session::new(passthrough_config()).unwrap();
        run_pulses(&mut session, &[1000, 1800, 2600, 3400, 4200], 9998);
        assert_eq!(session.phase(), SessionPhase::Active);

        let outcome = session.tick(10_000, Ok(0.0));
        assert_eq!(outcome.phase, SessionPhase::Finished);
        assert!(outcome.report_due);

        let report = session.report(Some(RawTemperature::new(30, 0)));
        assert!(report.is_final);
        assert_eq!(report.temperature_c, Some(30.0));

        // Later ticks are ignored
        let ticks = session.stats().ticks;
        let outcome = session.tick(10_002, Ok(20.0));
        assert!(!outcome.report_due);
        assert_eq!(session.stats().ticks, ticks);
    }

    #[test]
    fn reset_restores_initial_state() {
        let config = passthrough_config();
        let mut session = Session::new(config).unwrap();
        run_pulses(&mut session, &[1000, 1800, 2600], 3000);
        session.report(Some(RawTemperature::new(36, 8)));

        session.reset();
        let fresh = Session::new(config).unwrap();

        assert_eq!(session.conditioner().state(), &FilterState::new(config.filter.window));
        assert_eq!(session.window(), fresh.window());
        assert_eq!(session.threshold(), fresh.threshold());
        assert_eq!(session.estimator().state(), fresh.estimator().state());
        assert_eq!(session.clock(), fresh.clock());
        assert_eq!(session.stats(), fresh.stats());
        assert_eq!(session.last_filtered(), 0.0);
        assert_eq!(session.report(None).temperature_c, None);

        // Idempotent
        session.reset();
        assert_eq!(session.window(), fresh.window());
        assert_eq!(session.clock(), fresh.clock());
    }
}
