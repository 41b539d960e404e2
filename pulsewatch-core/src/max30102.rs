//! MAX30102 Register Codec
//!
//! Byte-level encoding and decoding for the MAX30102 pulse oximeter. No bus
//! I/O happens here: a sensor adapter performs the I2C transactions and
//! hands the bytes to these functions.
//!
//! ## FIFO Layout
//!
//! In SpO2 mode each FIFO entry is six bytes, three per LED channel, most
//! significant byte first. Each 24-bit word carries an 18-bit
//! left-justified sample:
//!
//! ```text
//! byte:   [0]       [1]       [2]       [3]       [4]       [5]
//!         └──── RED (24 bits) ────┘     └───── IR (24 bits) ────┘
//!                      >> 6                         >> 6
//! ```
//!
//! The FIFO is a 32-entry ring; the write and read pointers are 5-bit
//! indices into it.
//!
//! ## Die Temperature
//!
//! `TEMP_INT` is a two's complement whole-degree byte and `TEMP_FRAC` holds
//! sixteenths of a degree in its low nibble. A conversion is started by
//! writing [`TEMP_CONVERSION_START`] to `TEMP_CONFIG`.

use crate::classifier::RawTemperature;

/// 7-bit I2C address
pub const ADDRESS: u8 = 0x57;

/// Value of the `PART_ID` register
pub const PART_ID: u8 = 0x15;

/// FIFO depth in samples
pub const FIFO_DEPTH: u8 = 32;

/// Bytes per FIFO entry in SpO2 mode
pub const FIFO_SAMPLE_BYTES: usize = 6;

/// `TEMP_CONFIG` value that starts one temperature conversion
pub const TEMP_CONVERSION_START: u8 = 0x01;

/// Largest decoded channel value
pub const SAMPLE_MAX: u32 = (1 << 18) - 1;

/// Register map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Interrupt status 1
    InterruptStatus1 = 0x00,
    /// Interrupt status 2
    InterruptStatus2 = 0x01,
    /// Interrupt enable 1
    InterruptEnable1 = 0x02,
    /// Interrupt enable 2
    InterruptEnable2 = 0x03,
    /// FIFO write pointer
    FifoWritePtr = 0x04,
    /// FIFO overflow counter
    OverflowCounter = 0x05,
    /// FIFO read pointer
    FifoReadPtr = 0x06,
    /// FIFO data window
    FifoData = 0x07,
    /// FIFO averaging and rollover
    FifoConfig = 0x08,
    /// Operating mode
    ModeConfig = 0x09,
    /// ADC range, sample rate and pulse width
    Spo2Config = 0x0A,
    /// Red LED current
    Led1PulseAmplitude = 0x0C,
    /// IR LED current
    Led2PulseAmplitude = 0x0D,
    /// Die temperature, whole degrees
    TempInteger = 0x1F,
    /// Die temperature, sixteenths
    TempFraction = 0x20,
    /// Die temperature conversion control
    TempConfig = 0x21,
    /// Part identifier
    PartId = 0xFF,
}

impl Register {
    /// Register address byte
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Register writes that bring the device up for heart-rate sampling:
/// clear the FIFO pointers, 4-sample averaging with rollover, SpO2 mode,
/// 100 Hz at 411 µs pulse width, 7.2 mA on both LEDs.
pub const INIT_SEQUENCE: [(Register, u8); 8] = [
    (Register::FifoWritePtr, 0x00),
    (Register::OverflowCounter, 0x00),
    (Register::FifoReadPtr, 0x00),
    (Register::FifoConfig, 0x0F),
    (Register::ModeConfig, 0x03),
    (Register::Spo2Config, 0x27),
    (Register::Led1PulseAmplitude, 0x24),
    (Register::Led2PulseAmplitude, 0x24),
];

/// One decoded FIFO entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoSample {
    /// Red LED channel
    pub red: u32,
    /// Infrared LED channel
    pub ir: u32,
}

impl FifoSample {
    /// IR channel as the raw PPG value fed to the pipeline
    pub fn ppg(&self) -> f32 {
        self.ir as f32
    }
}

fn channel(bytes: [u8; 3]) -> u32 {
    ((u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])) >> 6
}

/// Decode one six-byte FIFO entry
pub fn decode_fifo_sample(data: &[u8; FIFO_SAMPLE_BYTES]) -> FifoSample {
    FifoSample {
        red: channel([data[0], data[1], data[2]]),
        ir: channel([data[3], data[4], data[5]]),
    }
}

/// Samples waiting in the FIFO given the write and read pointers
pub fn fifo_sample_count(write_ptr: u8, read_ptr: u8) -> u8 {
    let write_ptr = write_ptr % FIFO_DEPTH;
    let read_ptr = read_ptr % FIFO_DEPTH;
    if write_ptr >= read_ptr {
        write_ptr - read_ptr
    } else {
        write_ptr + FIFO_DEPTH - read_ptr
    }
}

/// Decode the `TEMP_INT`/`TEMP_FRAC` pair
pub fn decode_temperature(temp_int: u8, temp_frac: u8) -> RawTemperature {
    RawTemperature::new(temp_int as i8, temp_frac & 0x0F)
}
