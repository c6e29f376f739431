//! Demo: extract features in parallel across window pairs
//!
//! Feature generation is a pure function of its two input windows, so
//! independent pairs can be processed concurrently. This demo fans the
//! window pairs of one buffer out over a rayon thread pool.

use rayon::prelude::*;

use notetrack_dsp::{Feature, FeatureBuilder, FeatureConfig, ThresholdPeakExtractor};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // 30 seconds of a two-tone signal
    let config = FeatureConfig::default();
    let sample_rate = config.sampling_frequency;
    let samples: Vec<f32> = (0..(sample_rate * 30.0) as usize)
        .map(|i| {
            let t = i as f32 / sample_rate;
            0.4 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
                + 0.3 * (2.0 * std::f32::consts::PI * 523.25 * t).sin()
        })
        .collect();

    let extractor = ThresholdPeakExtractor::new(
        config.peak_height_cutoff_multiplier,
        config.peak_minimum_note_distance,
    );
    let builder = FeatureBuilder::new(config.clone(), Box::new(extractor))?;

    let window_count = config.window_count_in_samples(samples.len());
    let start = Instant::now();

    let features: Vec<Feature> = (1..window_count)
        .into_par_iter()
        .map(|window| {
            let start0 = (window - 1) * config.step_size;
            let start1 = window * config.step_size;
            builder.generate(
                &samples[start0..start0 + config.window_size],
                &samples[start1..start1 + config.window_size],
            )
        })
        .collect();

    let elapsed = start.elapsed();
    println!(
        "Extracted {} features from {:.1}s of audio in {:.1}ms",
        features.len(),
        samples.len() as f32 / sample_rate,
        elapsed.as_secs_f32() * 1000.0
    );

    Ok(())
}
