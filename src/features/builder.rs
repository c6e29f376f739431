//! Feature assembly
//!
//! Orchestrates spectrum computation, band aggregation, and peak extraction
//! per pair of consecutive analysis windows, producing one [`Feature`] per
//! time step.

use serde::{Deserialize, Serialize};

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::features::bands::band_spectrum;
use crate::features::frequency::freq_to_note;
use crate::features::peaks::{PeakExtractor, Point};
use crate::features::spectrum::SpectrumAnalyzer;

/// One multi-part feature vector, the unit of output passed downstream
///
/// All four vectors have the same configuration-determined length (one
/// entry per band note).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Root-mean-square level of the current window
    pub rms: f32,

    /// Band-aggregated spectrum of the current window
    pub spectrum: Vec<f32>,

    /// Element-wise difference between the current and previous band
    /// vectors
    pub spectral_flux: Vec<f32>,

    /// Magnitude of the nearest spectral peak per note slot, zero if none
    pub peak_heights: Vec<f32>,

    /// Fractional note offset of the nearest spectral peak per note slot,
    /// zero if none
    pub peak_locations: Vec<f32>,
}

/// Root-mean-square of a sample buffer
///
/// Returns 0.0 for an empty buffer.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&x| x * x).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Feature pipeline for pairs of consecutive analysis windows
///
/// Owns the planned FFT, the precomputed analysis window, and the peak
/// extraction capability. Each [`generate`](FeatureBuilder::generate) call
/// is a pure function of its two input buffers, so one builder can serve
/// independent window pairs concurrently.
pub struct FeatureBuilder {
    config: FeatureConfig,
    analyzer: SpectrumAnalyzer,
    peak_extractor: Box<dyn PeakExtractor + Send + Sync>,
    /// Spectrum bin width in Hz
    base_frequency: f32,
}

impl FeatureBuilder {
    /// Create a feature builder with the given peak extraction capability
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::InvalidConfiguration` if the configuration
    /// fails validation.
    pub fn new(
        config: FeatureConfig,
        peak_extractor: Box<dyn PeakExtractor + Send + Sync>,
    ) -> Result<Self, FeatureError> {
        config.validate()?;

        let analyzer = SpectrumAnalyzer::new(config.window_size);
        let base_frequency = config.base_frequency();

        Ok(Self {
            config,
            analyzer,
            peak_extractor,
            base_frequency,
        })
    }

    /// The builder's configuration
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Generate one feature from a pair of consecutive analysis windows
    ///
    /// `data0` is the previous window, `data1` the current one.
    ///
    /// # Panics
    ///
    /// Panics if either buffer's length does not match the configured
    /// window size; callers always supply fixed-length buffers.
    pub fn generate(&self, data0: &[f32], data1: &[f32]) -> Feature {
        log::debug!(
            "Generating feature from window pair: {} + {} samples",
            data0.len(),
            data1.len()
        );

        let rms = rms(data1);

        // Previous spectrum
        let spectrum0 = self.analyzer.magnitudes(data0);

        // Extract peaks from the current spectrum
        let spectrum1 = self.analyzer.magnitudes(data1);
        let points1 = self.spectrum_points(&spectrum1);
        let mut peaks1 = self.peak_extractor.extract(&points1, rms);
        peaks1.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));

        let (peak_heights, peak_locations) = self.peak_vectors(&peaks1);

        let bands0 = band_spectrum(
            &spectrum0,
            self.base_frequency,
            &self.config.band_note_range,
            self.config.band_size,
        );
        let bands1 = band_spectrum(
            &spectrum1,
            self.base_frequency,
            &self.config.band_note_range,
            self.config.band_size,
        );

        let spectral_flux = bands1
            .iter()
            .zip(bands0.iter())
            .map(|(b1, b0)| b1 - b0)
            .collect();

        let feature = Feature {
            rms,
            spectrum: bands1,
            spectral_flux,
            peak_heights,
            peak_locations,
        };

        log::debug!(
            "Generated feature: rms={:.6}, {} bands, {} note slots with peaks",
            feature.rms,
            feature.spectrum.len(),
            feature.peak_heights.iter().filter(|&&h| h > 0.0).count()
        );

        feature
    }

    /// Convert a magnitude spectrum to frequency/magnitude points
    pub fn spectrum_points(&self, spectrum: &[f32]) -> Vec<Point> {
        spectrum
            .iter()
            .enumerate()
            .map(|(i, &y)| Point {
                x: self.base_frequency * i as f32,
                y,
            })
            .collect()
    }

    /// Distribute peaks over note slots, strongest peak first
    ///
    /// Each peak claims the slot nearest its frequency; a claimed slot is
    /// not overwritten. Heights record the peak magnitude, locations its
    /// fractional note offset from the slot center.
    fn peak_vectors(&self, peaks: &[Point]) -> (Vec<f32>, Vec<f32>) {
        let count = self.config.band_count();
        let start = *self.config.band_note_range.start() as f32;
        let band_size = self.config.band_size;

        let mut heights = vec![0.0; count];
        let mut locations = vec![0.0; count];
        let mut claimed = vec![false; count];

        for peak in peaks {
            let note = freq_to_note(peak.x);
            let slot = ((note - start) / band_size).round();
            if slot < 0.0 || slot >= count as f32 {
                continue;
            }
            let index = slot as usize;
            if claimed[index] {
                continue;
            }
            claimed[index] = true;
            heights[index] = peak.y;
            locations[index] = note - (start + slot * band_size);
        }

        (heights, locations)
    }
}
