//! Demo: extract features from a synthetic buffer
//!
//! This demo runs the full feature pipeline over a generated tone and
//! prints a summary of the output.

use notetrack_dsp::{extract_features, FeatureConfig, ThresholdPeakExtractor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    // 2 seconds of A4 at the reference sampling rate
    let config = FeatureConfig::default();
    let samples: Vec<f32> = (0..(config.sampling_frequency * 2.0) as usize)
        .map(|i| {
            (2.0 * std::f32::consts::PI * 440.0 * i as f32 / config.sampling_frequency).sin() * 0.5
        })
        .collect();

    let extractor = ThresholdPeakExtractor::new(
        config.peak_height_cutoff_multiplier,
        config.peak_minimum_note_distance,
    );
    let features = extract_features(&samples, Box::new(extractor), config.clone())?;

    println!("Extracted {} features from {} samples", features.len(), samples.len());

    if let Some(feature) = features.first() {
        let (max_slot, max_value) = feature
            .spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, &v)| (i, v))
            .unwrap();
        let peak_count = feature.peak_heights.iter().filter(|&&h| h > 0.0).count();

        println!("First feature:");
        println!("  RMS: {:.4}", feature.rms);
        println!(
            "  Strongest band: note {} (value {:.2})",
            *config.band_note_range.start() as usize + max_slot,
            max_value
        );
        println!("  Note slots with peaks: {}", peak_count);
    }

    Ok(())
}
