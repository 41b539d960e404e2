//! Health Classifier
//!
//! Maps the displayed BPM and the body-temperature reading onto coarse
//! categories. Pure functions of the inputs and the configured limits;
//! called at the display cadence, never per sample.
//!
//! | Heart rate          | Category      |
//! |---------------------|---------------|
//! | 0                   | NoReading     |
//! | 0 < bpm < 60        | Bradycardia   |
//! | 60 ≤ bpm ≤ 100      | Normal        |
//! | bpm > 100           | Tachycardia   |
//!
//! | Temperature (°C)    | Category      |
//! |---------------------|---------------|
//! | t < 28              | Hypothermia   |
//! | 28 ≤ t ≤ 34         | Normal        |
//! | t > 34              | Fever         |
//!
//! The default refractory period keeps the displayed BPM at or below 92, so
//! Tachycardia only appears with a shorter `refractory_ms`.

use crate::{config::ClassifierConfig, constants::vitals::TEMPERATURE_FRACTION_STEP_C};

/// Heart-rate condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeartRateCategory {
    /// Insufficient data; rendered distinctly from Normal
    NoReading,
    /// Below the bradycardia limit
    Bradycardia,
    /// Within limits
    Normal,
    /// Above the tachycardia limit
    Tachycardia,
}

impl HeartRateCategory {
    /// Short label for the display
    pub const fn label(&self) -> &'static str {
        match self {
            HeartRateCategory::NoReading => "No reading",
            HeartRateCategory::Bradycardia => "Bradycardia",
            HeartRateCategory::Normal => "Normal",
            HeartRateCategory::Tachycardia => "Tachycardia",
        }
    }
}

/// Body-temperature condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TemperatureCategory {
    /// Below the hypothermia limit
    Hypothermia,
    /// Within limits
    Normal,
    /// Above the fever limit
    Fever,
}

impl TemperatureCategory {
    /// Short label for the display
    pub const fn label(&self) -> &'static str {
        match self {
            TemperatureCategory::Hypothermia => "Hypothermia",
            TemperatureCategory::Normal => "Normal",
            TemperatureCategory::Fever => "Fever",
        }
    }
}

/// Temperature as reported by the sensor: a signed integer part and a
/// 4-bit fraction in sixteenths of a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTemperature {
    /// Whole degrees, two's complement
    pub int_part: i8,
    /// Sixteenths of a degree; only the low 4 bits are meaningful
    pub frac_4bit: u8,
}

impl RawTemperature {
    /// Build from the two register bytes
    pub const fn new(int_part: i8, frac_4bit: u8) -> Self {
        Self { int_part, frac_4bit }
    }

    /// `int_part + frac · 0.0625` in °C
    pub fn celsius(&self) -> f32 {
        self.int_part as f32 + (self.frac_4bit & 0x0F) as f32 * TEMPERATURE_FRACTION_STEP_C
    }
}

/// Categories for one report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassificationResult {
    /// Heart-rate condition
    pub heart_rate: HeartRateCategory,
    /// Temperature condition; `None` until a temperature read succeeds
    pub temperature: Option<TemperatureCategory>,
}

/// Threshold classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthClassifier {
    config: ClassifierConfig,
}

impl HealthClassifier {
    /// Create a classifier with the given limits
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Categorise a heart rate; 0 is always `NoReading`
    pub fn classify_bpm(&self, bpm: u32) -> HeartRateCategory {
        if bpm == 0 {
            HeartRateCategory::NoReading
        } else if bpm < self.config.bradycardia_below_bpm {
            HeartRateCategory::Bradycardia
        } else if bpm > self.config.tachycardia_above_bpm {
            HeartRateCategory::Tachycardia
        } else {
            HeartRateCategory::Normal
        }
    }

    /// Categorise a temperature in °C
    pub fn classify_temperature(&self, celsius: f32) -> TemperatureCategory {
        if celsius < self.config.hypothermia_below_c {
            TemperatureCategory::Hypothermia
        } else if celsius > self.config.fever_above_c {
            TemperatureCategory::Fever
        } else {
            TemperatureCategory::Normal
        }
    }

    /// Categorise both channels
    pub fn classify(&self, bpm: u32, temperature_c: Option<f32>) -> ClassificationResult {
        ClassificationResult {
            heart_rate: self.classify_bpm(bpm),
            temperature: temperature_c.map(|t| self.classify_temperature(t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_rate_boundaries() {
        let classifier = HealthClassifier::default();
        assert_eq!(classifier.classify_bpm(0), HeartRateCategory::NoReading);
        assert_eq!(classifier.classify_bpm(1), HeartRateCategory::Bradycardia);
        assert_eq!(classifier.classify_bpm(59), HeartRateCategory::Bradycardia);
        assert_eq!(classifier.classify_bpm(60), HeartRateCategory::Normal);
        assert_eq!(classifier.classify_bpm(100), HeartRateCategory::Normal);
        assert_eq!(classifier.classify_bpm(101), HeartRateCategory::Tachycardia);
    }

    #[test]
    fn temperature_boundaries() {
        let classifier = HealthClassifier::default();
        assert_eq!(classifier.classify_temperature(27.9), TemperatureCategory::Hypothermia);
        assert_eq!(classifier.classify_temperature(28.0), TemperatureCategory::Normal);
        assert_eq!(classifier.classify_temperature(34.0), TemperatureCategory::Normal);
        assert_eq!(classifier.classify_temperature(34.1), TemperatureCategory::Fever);
    }

    #[test]
    fn raw_temperature_fraction() {
        assert_eq!(RawTemperature::new(27, 15).celsius(), 27.9375);
        assert_eq!(RawTemperature::new(34, 1).celsius(), 34.0625);
        assert_eq!(RawTemperature::new(-3, 8).celsius(), -2.5);
        // Upper nibble is ignored
        assert_eq!(RawTemperature::new(30, 0xF4).celsius(), 30.25);
    }

    #[test]
    fn raw_temperature_classification() {
        let classifier = HealthClassifier::default();
        assert_eq!(
            classifier.classify_temperature(RawTemperature::new(27, 15).celsius()),
            TemperatureCategory::Hypothermia
        );
        assert_eq!(
            classifier.classify_temperature(RawTemperature::new(34, 0).celsius()),
            TemperatureCategory::Normal
        );
        assert_eq!(
            classifier.classify_temperature(RawTemperature::new(34, 1).celsius()),
            TemperatureCategory::Fever
        );
    }

    #[test]
    fn custom_limits() {
        let classifier = HealthClassifier::new(ClassifierConfig {
            bradycardia_below_bpm: 50,
            tachycardia_above_bpm: 120,
            ..ClassifierConfig::default()
        });
        assert_eq!(classifier.classify_bpm(55), HeartRateCategory::Normal);
        assert_eq!(classifier.classify_bpm(110), HeartRateCategory::Normal);
    }

    #[test]
    fn missing_temperature() {
        let result = HealthClassifier::default().classify(75, None);
        assert_eq!(result.heart_rate, HeartRateCategory::Normal);
        assert_eq!(result.temperature, None);
    }
}
