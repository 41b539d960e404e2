//! Property tests for the pipeline invariants

use proptest::prelude::*;

use pulsewatch_core::{
    buffer::RunningAverage,
    classifier::HealthClassifier,
    conditioner::SignalConditioner,
    detector::PeakWindow,
    estimator::estimate,
    max30102::{decode_fifo_sample, fifo_sample_count, FIFO_DEPTH, SAMPLE_MAX},
    FilterConfig, HeartRateCategory,
};

proptest! {
    #[test]
    fn peak_window_is_bounded_and_increasing(
        timestamps in prop::collection::vec(0u64..100_000, 0..40)
    ) {
        let mut window = PeakWindow::new();
        for t in timestamps {
            let newest = window.newest();
            let accepted = window.push(t);
            prop_assert_eq!(accepted, newest.map_or(true, |n| t > n));
            prop_assert!(window.count() <= window.capacity());
        }
        let stored: Vec<u64> = window.iter().collect();
        prop_assert!(stored.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn estimate_is_zero_below_two_beats(t in any::<u64>()) {
        let mut window = PeakWindow::new();
        prop_assert_eq!(estimate(&window), 0);
        window.push(t);
        prop_assert_eq!(estimate(&window), 0);
    }

    #[test]
    fn evenly_spaced_beats_give_exact_rate(interval in 300u64..2000, count in 2usize..=5) {
        let mut window = PeakWindow::new();
        for i in 0..count as u64 {
            window.push(1000 + i * interval);
        }
        prop_assert_eq!(estimate(&window), (60_000 / interval) as u32);
    }

    #[test]
    fn conditioner_passes_low_pass_through_until_filled(
        window in 2usize..=10,
        samples in prop::collection::vec(0.0f32..4096.0, 1..10)
    ) {
        let config = FilterConfig { window, ..FilterConfig::default() };
        let mut conditioner = SignalConditioner::new(config);
        for (i, raw) in samples.into_iter().enumerate() {
            let output = conditioner.condition(raw).unwrap();
            if i + 1 < window {
                prop_assert_eq!(output, conditioner.state().prev_low_pass);
            }
        }
    }

    #[test]
    fn running_average_matches_naive_mean(
        values in prop::collection::vec(-1000.0f32..1000.0, 1..30),
        window in 1usize..=10
    ) {
        let mut average = RunningAverage::<10>::new(window);
        for &value in &values {
            average.push(value);
        }
        let tail = &values[values.len().saturating_sub(window)..];
        let naive = tail.iter().sum::<f32>() / tail.len() as f32;
        let mean = average.mean().unwrap();
        prop_assert!((mean - naive).abs() < 0.01, "mean {} naive {}", mean, naive);
    }

    #[test]
    fn nonzero_bpm_is_never_no_reading(bpm in 1u32..400) {
        prop_assert_ne!(HealthClassifier::default().classify_bpm(bpm), HeartRateCategory::NoReading);
    }

    #[test]
    fn fifo_channels_fit_18_bits(bytes in any::<[u8; 6]>()) {
        let sample = decode_fifo_sample(&bytes);
        prop_assert!(sample.red <= SAMPLE_MAX);
        prop_assert!(sample.ir <= SAMPLE_MAX);
    }

    #[test]
    fn fifo_count_below_depth(write in any::<u8>(), read in any::<u8>()) {
        prop_assert!(fifo_sample_count(write, read) < FIFO_DEPTH);
    }
}
