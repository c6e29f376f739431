//! # Notetrack DSP
//!
//! An audio feature extraction and score-following engine for neural note
//! detection, converting raw audio into fixed-size feature vectors and
//! keeping live network predictions aligned to a reference onset sequence.
//!
//! ## Features
//!
//! - **Spectral features**: Hamming-windowed magnitude spectra folded into
//!   per-note bands, spectral flux, and peak descriptors
//! - **Peak extraction**: pluggable capability with a reference
//!   height-cutoff + minimum-distance implementation
//! - **Onset tracking**: falling-edge triggered cursor realignment against
//!   a reference onset sequence
//!
//! ## Quick Start
//!
//! ```no_run
//! use notetrack_dsp::{extract_features, FeatureConfig, ThresholdPeakExtractor};
//!
//! // Mono audio samples, normalized to [-1.0, 1.0]
//! let samples: Vec<f32> = vec![0.0; 44100];
//!
//! let config = FeatureConfig::default();
//! let extractor = ThresholdPeakExtractor::new(
//!     config.peak_height_cutoff_multiplier,
//!     config.peak_minimum_note_distance,
//! );
//! let features = extract_features(&samples, Box::new(extractor), config)?;
//!
//! println!("Extracted {} features", features.len());
//! # Ok::<(), notetrack_dsp::FeatureError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Sample buffers → Spectrum → Bands + Peaks → Feature → (network) → Tracker
//! ```
//!
//! The feature pipeline is stateless between calls; the [`Tracker`] is
//! explicitly stateful and must see frames in order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod features;
pub mod tracking;

// Re-export main types
pub use config::FeatureConfig;
pub use error::FeatureError;
pub use features::builder::{Feature, FeatureBuilder};
pub use features::peaks::{PeakExtractor, Point, ThresholdPeakExtractor};
pub use tracking::{Onset, Tracker};

/// Extract one feature per pair of consecutive analysis windows
///
/// Slides the analysis window across the buffer at the configured step
/// size and feeds each pair of consecutive windows through the feature
/// pipeline. A buffer holding `n` windows yields `n - 1` features; buffers
/// shorter than two windows yield none.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `peak_extractor` - The peak extraction capability to use
/// * `config` - Feature extraction configuration
///
/// # Errors
///
/// Returns `FeatureError::InvalidConfiguration` if the configuration fails
/// validation.
///
/// # Example
///
/// ```no_run
/// use notetrack_dsp::{extract_features, FeatureConfig, ThresholdPeakExtractor};
///
/// let samples = vec![0.0f32; 44100];
/// let features = extract_features(
///     &samples,
///     Box::new(ThresholdPeakExtractor::new(0.05, 0.5)),
///     FeatureConfig::default(),
/// )?;
/// # Ok::<(), notetrack_dsp::FeatureError>(())
/// ```
pub fn extract_features(
    samples: &[f32],
    peak_extractor: Box<dyn PeakExtractor + Send + Sync>,
    config: FeatureConfig,
) -> Result<Vec<Feature>, FeatureError> {
    let builder = FeatureBuilder::new(config, peak_extractor)?;
    let config = builder.config();

    let window_count = config.window_count_in_samples(samples.len());
    log::debug!(
        "Extracting features: {} samples, {} windows of {} (step {})",
        samples.len(),
        window_count,
        config.window_size,
        config.step_size
    );

    if window_count < 2 {
        log::warn!(
            "Buffer of {} samples holds {} windows; need at least 2 for features",
            samples.len(),
            window_count
        );
        return Ok(vec![]);
    }

    let mut features = Vec::with_capacity(window_count - 1);
    for window in 1..window_count {
        let start0 = (window - 1) * config.step_size;
        let start1 = window * config.step_size;
        let data0 = &samples[start0..start0 + config.window_size];
        let data1 = &samples[start1..start1 + config.window_size];
        features.push(builder.generate(data0, data1));
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_extractor(config: &FeatureConfig) -> Box<dyn PeakExtractor + Send + Sync> {
        Box::new(ThresholdPeakExtractor::new(
            config.peak_height_cutoff_multiplier,
            config.peak_minimum_note_distance,
        ))
    }

    #[test]
    fn test_extract_features_counts_window_pairs() {
        let config = FeatureConfig {
            window_size: 1024,
            step_size: 256,
            ..FeatureConfig::default()
        };

        // 5 windows fit: 1024 + 4 * 256 = 2048 samples
        let samples = vec![0.0; 2048];
        let features =
            extract_features(&samples, default_extractor(&config), config.clone()).unwrap();
        assert_eq!(features.len(), 4);
    }

    #[test]
    fn test_extract_features_short_buffer_is_empty() {
        let config = FeatureConfig::default();
        let samples = vec![0.0; 100];
        let features =
            extract_features(&samples, default_extractor(&config), config.clone()).unwrap();
        assert!(features.is_empty());

        // Exactly one window: still no pair
        let samples = vec![0.0; config.window_size];
        let features =
            extract_features(&samples, default_extractor(&config), config.clone()).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_extract_features_rejects_invalid_config() {
        let config = FeatureConfig {
            window_size: 0,
            ..FeatureConfig::default()
        };
        let result = extract_features(&[], default_extractor(&config), config);
        assert!(result.is_err());
    }
}
