//! Sensor Adapter Traits
//!
//! Adapters wrap the bus drivers. They are responsible for logging their
//! own transaction failures and for any retry policy; the pipeline treats
//! an `Err` as "no sample this tick" and carries on.
//!
//! ## Example Implementation
//!
//! ```rust
//! use pulsewatch_core::traits::PulseSensor;
//! use pulsewatch_core::errors::SensorError;
//!
//! /// 12-bit SAADC channel wired to an analog pulse sensor
//! struct AnalogPulse {
//!     // ... ADC handle
//! }
//!
//! impl PulseSensor for AnalogPulse {
//!     fn sample_raw(&mut self) -> Result<f32, SensorError> {
//!         // Blocking single conversion, counts in 0..4096
//!         Ok(2048.0)
//!     }
//! }
//! ```

use crate::{classifier::RawTemperature, errors::SensorError};

/// Source of raw PPG samples
pub trait PulseSensor {
    /// Read one raw sample in `[0, device_max)`.
    ///
    /// Must complete within a bounded, hardware-determined time.
    fn sample_raw(&mut self) -> Result<f32, SensorError>;
}

/// Source of body-temperature readings
pub trait TemperatureSensor {
    /// Read the temperature as an integer part and a 4-bit fraction
    fn read_temperature(&mut self) -> Result<RawTemperature, SensorError>;
}

impl<T: PulseSensor + ?Sized> PulseSensor for &mut T {
    fn sample_raw(&mut self) -> Result<f32, SensorError> {
        (**self).sample_raw()
    }
}

impl<T: TemperatureSensor + ?Sized> TemperatureSensor for &mut T {
    fn read_temperature(&mut self) -> Result<RawTemperature, SensorError> {
        (**self).read_temperature()
    }
}
