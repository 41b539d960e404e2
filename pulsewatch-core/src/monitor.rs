//! Monitor: the tick loop
//!
//! Binds a [`Session`] to its adapters and a [`Scheduler`]. Each tick reads
//! the pulse sensor and feeds the session; at the report cadence the
//! temperature sensor is read and the report is rendered. When the
//! measurement window closes the registration is cancelled and the final
//! report is returned.
//!
//! ```rust
//! use pulsewatch_core::{Monitor, PipelineConfig};
//! use pulsewatch_core::classifier::RawTemperature;
//! use pulsewatch_core::display::{Category, Field, Rgb565};
//! use pulsewatch_core::errors::SensorError;
//! use pulsewatch_core::scheduler::VirtualScheduler;
//! use pulsewatch_core::traits::{Display, PulseSensor, TemperatureSensor};
//!
//! struct Flat;
//! impl PulseSensor for Flat {
//!     fn sample_raw(&mut self) -> Result<f32, SensorError> { Ok(2000.0) }
//! }
//! impl TemperatureSensor for Flat {
//!     fn read_temperature(&mut self) -> Result<RawTemperature, SensorError> {
//!         Ok(RawTemperature::new(31, 4))
//!     }
//! }
//! struct Blank;
//! impl Display for Blank {
//!     fn render_value(&mut self, _: u32, _: Field) {}
//!     fn render_label(&mut self, _: &str, _: Field, _: Rgb565, _: Rgb565) {}
//!     fn render_category(&mut self, _: Category, _: Field) {}
//! }
//!
//! let mut monitor = Monitor::new(PipelineConfig::default(), Flat, Flat, Blank)?;
//! let report = monitor.run(&mut VirtualScheduler::new())?;
//! assert!(report.is_final);
//! assert_eq!(report.bpm, 0);
//! # Ok::<(), pulsewatch_core::VitalsError>(())
//! ```

use crate::{
    config::PipelineConfig,
    display::render_report,
    errors::VitalsResult,
    session::{Session, VitalsReport},
    time::Timestamp,
    traits::{Display, PulseSensor, Scheduler, TemperatureSensor},
};

/// Session driven by adapters
#[derive(Debug)]
pub struct Monitor<P, T, D> {
    session: Session,
    pulse: P,
    temperature: T,
    display: D,
}

impl<P, T, D> Monitor<P, T, D>
where
    P: PulseSensor,
    T: TemperatureSensor,
    D: Display,
{
    /// Validate `config` and bind the adapters
    pub fn new(config: PipelineConfig, pulse: P, temperature: T, display: D) -> VitalsResult<Self> {
        Ok(Self {
            session: Session::new(config)?,
            pulse,
            temperature,
            display,
        })
    }

    /// Drive the session until it finishes or the scheduler runs dry.
    ///
    /// Returns the final report, or the state at the last delivered tick
    /// when the scheduler stops first (continuous sessions). A failed
    /// registration is returned as an error before any tick runs.
    pub fn run<S: Scheduler>(&mut self, scheduler: &mut S) -> VitalsResult<VitalsReport> {
        let interval_ms = self.session.config().sample_interval_ms;
        let handle = scheduler.register_periodic(interval_ms).map_err(|error| {
            log_warn!("could not register {} ms sampling tick: {}", interval_ms, error);
            error
        })?;
        log_info!("sampling every {} ms", interval_ms);

        while let Some((fired, now_ms)) = scheduler.next_tick() {
            if fired != handle {
                continue;
            }
            if let Some(report) = self.step(now_ms) {
                if report.is_final {
                    scheduler.cancel(handle);
                    return Ok(report);
                }
            }
        }

        scheduler.cancel(handle);
        log_info!("scheduler stopped before the session finished");
        Ok(self.session.report(None))
    }

    /// Run one tick at `now_ms`; returns the report if one was rendered
    pub fn step(&mut self, now_ms: Timestamp) -> Option<VitalsReport> {
        let raw = self.pulse.sample_raw();
        let outcome = self.session.tick(now_ms, raw);
        if !outcome.report_due {
            return None;
        }

        let temperature = match self.temperature.read_temperature() {
            Ok(reading) => Some(reading),
            Err(error) => {
                log_warn!("temperature read failed: {}", error);
                None
            }
        };

        let report = self.session.report(temperature);
        render_report(&mut self.display, &report);
        Some(report)
    }

    /// Start a new measurement with the same adapters
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Underlying session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Display adapter
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Release the adapters
    pub fn into_parts(self) -> (P, T, D) {
        (self.pulse, self.temperature, self.display)
    }
}
