//! Display Layout and Report Rendering
//!
//! The screen is split into named [`Field`]s. [`render_report`] maps a
//! [`VitalsReport`] onto them through any [`Display`] implementation:
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Status       (label)     │
//! │ Bpm          (value)     │
//! │ HeartRate    (category)  │
//! │ Temperature  (value, dC) │
//! │ TempCategory (category)  │
//! └──────────────────────────┘
//! ```
//!
//! During stabilisation only the status placeholder is drawn.

use crate::{
    classifier::{HeartRateCategory, TemperatureCategory},
    session::{SessionPhase, VitalsReport},
    traits::Display,
};

/// Region of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Session status line
    Status,
    /// Heart rate in BPM
    Bpm,
    /// Heart-rate category
    HeartRate,
    /// Body temperature in tenths of a degree
    Temperature,
    /// Temperature category
    TemperatureCategory,
}

/// 16-bit RGB565 colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    /// Black
    pub const BLACK: Rgb565 = Rgb565(0x0000);
    /// White
    pub const WHITE: Rgb565 = Rgb565(0xFFFF);
    /// Red
    pub const RED: Rgb565 = Rgb565(0xF800);
    /// Green
    pub const GREEN: Rgb565 = Rgb565(0x07E0);
    /// Blue
    pub const BLUE: Rgb565 = Rgb565(0x001F);
    /// Yellow
    pub const YELLOW: Rgb565 = Rgb565(0xFFE0);

    /// Pack 8-bit channels
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Rgb565(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }
}

/// Health category to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Category {
    /// Heart-rate condition
    Heart(HeartRateCategory),
    /// Temperature condition
    Temperature(TemperatureCategory),
}

impl Category {
    /// Display text
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Heart(category) => category.label(),
            Category::Temperature(category) => category.label(),
        }
    }

    /// Foreground colour: green when within limits, white for no reading
    pub const fn color(&self) -> Rgb565 {
        match self {
            Category::Heart(HeartRateCategory::NoReading) => Rgb565::WHITE,
            Category::Heart(HeartRateCategory::Normal)
            | Category::Temperature(TemperatureCategory::Normal) => Rgb565::GREEN,
            Category::Heart(HeartRateCategory::Bradycardia)
            | Category::Temperature(TemperatureCategory::Hypothermia) => Rgb565::BLUE,
            Category::Heart(HeartRateCategory::Tachycardia)
            | Category::Temperature(TemperatureCategory::Fever) => Rgb565::RED,
        }
    }
}

/// Status placeholder shown while the filters settle
pub const STABILIZING_LABEL: &str = "Stabilizing...";
/// Status while measuring
pub const MEASURING_LABEL: &str = "Measuring";
/// Status once the measurement window has closed
pub const FINAL_LABEL: &str = "Final";

/// Temperature in tenths of a degree, clamped at zero for the unsigned
/// digit renderer
pub fn temperature_digits(celsius: f32) -> u32 {
    let tenths = libm::roundf(celsius * 10.0);
    if tenths > 0.0 {
        tenths as u32
    } else {
        0
    }
}

/// Draw one report
pub fn render_report<D: Display + ?Sized>(display: &mut D, report: &VitalsReport) {
    match report.phase {
        SessionPhase::Stabilizing => {
            display.render_label(STABILIZING_LABEL, Field::Status, Rgb565::YELLOW, Rgb565::BLACK);
            return;
        }
        SessionPhase::Active => {
            display.render_label(MEASURING_LABEL, Field::Status, Rgb565::WHITE, Rgb565::BLACK);
        }
        SessionPhase::Finished => {
            display.render_label(FINAL_LABEL, Field::Status, Rgb565::GREEN, Rgb565::BLACK);
        }
    }

    display.render_value(report.bpm, Field::Bpm);
    display.render_category(Category::Heart(report.classification.heart_rate), Field::HeartRate);

    if let (Some(celsius), Some(category)) =
        (report.temperature_c, report.classification.temperature)
    {
        display.render_value(temperature_digits(celsius), Field::Temperature);
        display.render_category(Category::Temperature(category), Field::TemperatureCategory);
    }
}

/// Display that writes every call to the `log` facade; useful on hosts
/// without a panel
#[cfg(feature = "log")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

#[cfg(feature = "log")]
impl Display for LogDisplay {
    fn render_value(&mut self, digits: u32, field: Field) {
        log::info!("[{:?}] {}", field, digits);
    }

    fn render_label(&mut self, text: &str, field: Field, _fg: Rgb565, _bg: Rgb565) {
        log::info!("[{:?}] {}", field, text);
    }

    fn render_category(&mut self, category: Category, field: Field) {
        log::info!("[{:?}] {}", field, category.label());
    }
}
