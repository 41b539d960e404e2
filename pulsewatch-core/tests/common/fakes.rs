//! Scripted adapters

use pulsewatch_core::{
    classifier::RawTemperature,
    display::{Category, Field, Rgb565},
    errors::SensorError,
    time::Timestamp,
    traits::{Display, PulseSensor, TemperatureSensor},
};

use super::generators::PpgGenerator;

/// Pulse sensor replaying a generator on its own copy of the tick clock.
///
/// The first read happens at `interval_ms`, matching the first tick of a
/// `VirtualScheduler` registration.
pub struct ScriptedPulse {
    signal: PpgGenerator,
    interval_ms: u64,
    now_ms: Timestamp,
    /// Half-open ranges `[start, end)` during which reads fail
    pub faults: Vec<(Timestamp, Timestamp)>,
    /// Reads attempted
    pub reads: usize,
}

impl ScriptedPulse {
    pub fn new(signal: PpgGenerator, interval_ms: u32) -> Self {
        Self {
            signal,
            interval_ms: u64::from(interval_ms),
            now_ms: 0,
            faults: Vec::new(),
            reads: 0,
        }
    }

    pub fn with_fault(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.faults.push((start, end));
        self
    }
}

impl PulseSensor for ScriptedPulse {
    fn sample_raw(&mut self) -> Result<f32, SensorError> {
        self.now_ms += self.interval_ms;
        self.reads += 1;
        if self.faults.iter().any(|&(start, end)| self.now_ms >= start && self.now_ms < end) {
            return Err(SensorError::Nack);
        }
        Ok(self.signal.value_at(self.now_ms))
    }
}

/// Temperature sensor returning a fixed result
pub struct FixedTemperature(pub Result<RawTemperature, SensorError>);

impl TemperatureSensor for FixedTemperature {
    fn read_temperature(&mut self) -> Result<RawTemperature, SensorError> {
        self.0
    }
}

/// One display call
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Value(u32, Field),
    Label(String, Field, Rgb565),
    Category(Category, Field),
}

/// Display that records every call
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
}

impl RecordingDisplay {
    /// Labels drawn into the status field, in order
    pub fn status_labels(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DisplayCall::Label(text, Field::Status, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Last value drawn into `field`
    pub fn last_value(&self, field: Field) -> Option<u32> {
        self.calls.iter().rev().find_map(|call| match call {
            DisplayCall::Value(digits, f) if *f == field => Some(*digits),
            _ => None,
        })
    }

    /// Last category drawn into `field`
    pub fn last_category(&self, field: Field) -> Option<Category> {
        self.calls.iter().rev().find_map(|call| match call {
            DisplayCall::Category(category, f) if *f == field => Some(*category),
            _ => None,
        })
    }
}

impl Display for RecordingDisplay {
    fn render_value(&mut self, digits: u32, field: Field) {
        self.calls.push(DisplayCall::Value(digits, field));
    }

    fn render_label(&mut self, text: &str, field: Field, fg: Rgb565, _bg: Rgb565) {
        self.calls.push(DisplayCall::Label(text.to_string(), field, fg));
    }

    fn render_category(&mut self, category: Category, field: Field) {
        self.calls.push(DisplayCall::Category(category, field));
    }
}
