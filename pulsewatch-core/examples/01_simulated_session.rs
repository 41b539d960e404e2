//! Simulated Measurement Session
//!
//! Runs a full 30 s measurement against a synthetic 80 BPM pulse on the
//! virtual scheduler and prints every display update.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_session
//! ```

use pulsewatch_core::{
    classifier::RawTemperature,
    display::{Category, Field, Rgb565},
    errors::SensorError,
    scheduler::VirtualScheduler,
    traits::{Display, PulseSensor, TemperatureSensor},
    Monitor, PipelineConfig,
};

/// 80 BPM: a pulse every 750 ms on a 2000-count baseline
struct SyntheticPulse {
    now_ms: u64,
}

impl PulseSensor for SyntheticPulse {
    fn sample_raw(&mut self) -> Result<f32, SensorError> {
        self.now_ms += 2;
        let phase = (self.now_ms % 750) as f32;
        let pulse = if phase <= 40.0 {
            800.0 * phase / 40.0
        } else if phase < 340.0 {
            800.0 * (1.0 - (phase - 40.0) / 300.0)
        } else {
            0.0
        };
        Ok(2000.0 + pulse)
    }
}

struct Thermometer;

impl TemperatureSensor for Thermometer {
    fn read_temperature(&mut self) -> Result<RawTemperature, SensorError> {
        Ok(RawTemperature::new(32, 12))
    }
}

struct Console;

impl Display for Console {
    fn render_value(&mut self, digits: u32, field: Field) {
        println!("  {:<20} {}", format!("{:?}", field), digits);
    }

    fn render_label(&mut self, text: &str, field: Field, _fg: Rgb565, _bg: Rgb565) {
        println!("{:<22} {}", format!("{:?}", field), text);
    }

    fn render_category(&mut self, category: Category, field: Field) {
        println!("  {:<20} {}", format!("{:?}", field), category.label());
    }
}

fn main() {
    println!("PulseWatch Simulated Session");
    println!("============================\n");

    let config = PipelineConfig::default();
    let mut monitor = match Monitor::new(config, SyntheticPulse { now_ms: 0 }, Thermometer, Console) {
        Ok(monitor) => monitor,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return;
        }
    };

    match monitor.run(&mut VirtualScheduler::new()) {
        Ok(report) => {
            let stats = monitor.session().stats();
            println!("\nFinal: {} BPM ({})", report.bpm, report.classification.heart_rate.label());
            println!("Beats: {}, faults: {}, reports: {}", stats.beats, stats.adapter_faults, stats.reports);
        }
        Err(e) => eprintln!("Session aborted: {}", e),
    }
}
