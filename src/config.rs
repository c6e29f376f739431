//! Configuration parameters for feature extraction and tracking

use std::ops::RangeInclusive;

use crate::error::FeatureError;

/// Feature extraction and tracking configuration parameters
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    // Analysis windows
    /// Input sampling frequency in Hz (default: 44100.0)
    pub sampling_frequency: f32,

    /// Analysis window size in samples (default: 8192)
    pub window_size: usize,

    /// Step size between analysis windows in samples (default: 1024)
    pub step_size: usize,

    // Note ranges
    /// The range of MIDI note numbers the network can predict; determines
    /// label vector length (default: 36..=96)
    pub note_range: RangeInclusive<u32>,

    /// The range of MIDI note numbers included in the band spectrums
    /// (default: 24..=120)
    pub band_note_range: RangeInclusive<u32>,

    /// Band resolution in notes; bands are centered every `band_size`
    /// notes and span `band_size` notes (default: 1.0)
    pub band_size: f32,

    // Peak extraction
    /// Peak height cutoff as a multiplier of the window RMS (default: 0.05)
    pub peak_height_cutoff_multiplier: f32,

    /// Minimum distance between spectral peaks in notes (default: 0.5)
    pub peak_minimum_note_distance: f32,

    // Tracking
    /// Onset probability threshold for falling-edge detection (default: 0.5)
    pub onset_threshold: f32,

    /// Number of onsets past the cursor to consider when realigning
    /// (default: 4)
    pub lookahead: usize,

    /// Distance multiplier per candidate offset; must have at least
    /// `lookahead + 1` entries (default: [1.5, 1.1, 1.6, 1.7, 1.8])
    pub offset_weights: Vec<f32>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sampling_frequency: 44100.0,
            window_size: 8192,
            step_size: 1024,
            note_range: 36..=96,
            band_note_range: 24..=120,
            band_size: 1.0,
            peak_height_cutoff_multiplier: 0.05,
            peak_minimum_note_distance: 0.5,
            onset_threshold: 0.5,
            lookahead: 4,
            offset_weights: vec![1.5, 1.1, 1.6, 1.7, 1.8],
        }
    }
}

impl FeatureConfig {
    /// Validate configuration parameters
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::InvalidConfiguration` if any parameter is out
    /// of its valid domain.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.window_size == 0 {
            return Err(FeatureError::InvalidConfiguration(
                "Window size must be > 0".to_string(),
            ));
        }

        if self.step_size == 0 {
            return Err(FeatureError::InvalidConfiguration(
                "Step size must be > 0".to_string(),
            ));
        }

        if self.sampling_frequency <= 0.0 {
            return Err(FeatureError::InvalidConfiguration(format!(
                "Sampling frequency must be > 0, got {}",
                self.sampling_frequency
            )));
        }

        if self.note_range.is_empty() {
            return Err(FeatureError::InvalidConfiguration(format!(
                "Empty note range: {:?}",
                self.note_range
            )));
        }

        if self.band_note_range.is_empty() {
            return Err(FeatureError::InvalidConfiguration(format!(
                "Empty band note range: {:?}",
                self.band_note_range
            )));
        }

        if self.band_size <= 0.0 {
            return Err(FeatureError::InvalidConfiguration(format!(
                "Band size must be > 0, got {}",
                self.band_size
            )));
        }

        if self.offset_weights.len() < self.lookahead + 1 {
            return Err(FeatureError::InvalidConfiguration(format!(
                "Offset weights must have at least lookahead + 1 = {} entries, got {}",
                self.lookahead + 1,
                self.offset_weights.len()
            )));
        }

        Ok(())
    }

    /// Number of values in each band vector
    pub fn band_count(&self) -> usize {
        let span = (*self.band_note_range.end() - *self.band_note_range.start()) as f32;
        (span / self.band_size).floor() as usize + 1
    }

    /// Number of notes in the representable range; the length of label and
    /// prediction vectors
    pub fn note_count(&self) -> usize {
        (*self.note_range.end() - *self.note_range.start() + 1) as usize
    }

    /// Spectrum bin width in Hz
    pub fn base_frequency(&self) -> f32 {
        self.sampling_frequency / self.window_size as f32
    }

    /// Number of analysis windows that fit inside the given number of samples
    pub fn window_count_in_samples(&self, samples: usize) -> usize {
        if samples < self.window_size {
            return 0;
        }
        1 + (samples - self.window_size) / self.step_size
    }

    /// Number of samples covered by the given number of contiguous windows
    pub fn sample_count_in_windows(&self, windows: usize) -> usize {
        if windows < 1 {
            return 0;
        }
        (windows - 1) * self.step_size + self.window_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FeatureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_reference_values() {
        let config = FeatureConfig::default();
        assert_eq!(config.window_size, 8192);
        assert_eq!(config.step_size, 1024);
        assert_eq!(config.note_range, 36..=96);
        assert_eq!(config.band_note_range, 24..=120);
        assert_eq!(config.offset_weights, vec![1.5, 1.1, 1.6, 1.7, 1.8]);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let mut config = FeatureConfig::default();
        config.window_size = 0;
        assert!(config.validate().is_err());

        let mut config = FeatureConfig::default();
        config.step_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_short_weight_table() {
        let mut config = FeatureConfig::default();
        config.offset_weights = vec![1.0, 1.0];
        assert!(config.validate().is_err());

        // Exactly lookahead + 1 entries is fine
        config.lookahead = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_reversed_ranges() {
        let mut config = FeatureConfig::default();
        config.note_range = 96..=36;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_band_and_note_counts() {
        let config = FeatureConfig::default();
        assert_eq!(config.band_count(), 97); // 24..=120
        assert_eq!(config.note_count(), 61); // 36..=96
    }

    #[test]
    fn test_window_count_in_samples() {
        let config = FeatureConfig::default();
        assert_eq!(config.window_count_in_samples(0), 0);
        assert_eq!(config.window_count_in_samples(8191), 0);
        assert_eq!(config.window_count_in_samples(8192), 1);
        assert_eq!(config.window_count_in_samples(8192 + 1024), 2);
        assert_eq!(config.window_count_in_samples(44100), 36);
    }

    #[test]
    fn test_sample_count_round_trips_window_count() {
        let config = FeatureConfig::default();
        assert_eq!(config.sample_count_in_windows(0), 0);
        for windows in 1..16 {
            let samples = config.sample_count_in_windows(windows);
            assert_eq!(config.window_count_in_samples(samples), windows);
        }
    }
}
