//! Magnitude spectrum computation
//!
//! Applies a precomputed Hamming window to a fixed-length sample buffer and
//! computes magnitude values for the non-negative-frequency bins via a
//! forward FFT. The FFT plan is created once at construction and reused for
//! every window.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Windowed magnitude spectrum analyzer for fixed-length sample buffers
///
/// Bin `i` of the output corresponds to frequency
/// `i * sampling_frequency / window_size`. The complex work buffer is
/// allocated per call, so a shared analyzer can serve concurrent callers.
pub struct SpectrumAnalyzer {
    window_size: usize,
    /// Precomputed Hamming window coefficients
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for buffers of exactly `window_size` samples
    ///
    /// Plans the forward FFT up front; `window_size` must be > 0.
    pub fn new(window_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(window_size);

        // Hamming: 0.54 - 0.46 * cos(2*pi*i / (N - 1))
        let denominator = window_size.saturating_sub(1).max(1) as f32;
        let window = (0..window_size)
            .map(|i| 0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / denominator).cos())
            .collect();

        Self {
            window_size,
            window,
            fft,
        }
    }

    /// Analysis window length in samples
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Compute the magnitude spectrum of one analysis window
    ///
    /// Returns `window_size / 2 + 1` magnitude (not power) values, one per
    /// non-negative-frequency bin.
    ///
    /// # Panics
    ///
    /// Panics if `samples.len() != window_size`. Callers always supply
    /// fixed-length buffers; a mismatch is a programming error, not a
    /// recoverable condition.
    pub fn magnitudes(&self, samples: &[f32]) -> Vec<f32> {
        assert_eq!(
            samples.len(),
            self.window_size,
            "Sample buffer length {} does not match analysis window size {}",
            samples.len(),
            self.window_size
        );

        log::debug!(
            "Computing magnitude spectrum: {} samples, {} output bins",
            samples.len(),
            self.window_size / 2 + 1
        );

        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .zip(self.window.iter())
            .map(|(&x, &w)| Complex::new(x * w, 0.0))
            .collect();

        self.fft.process(&mut buffer);

        let magnitudes: Vec<f32> = buffer[..=self.window_size / 2]
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt())
            .collect();

        log::debug!(
            "Computed {} magnitude bins, max={:.6}",
            magnitudes.len(),
            magnitudes.iter().copied().fold(0.0f32, f32::max)
        );

        magnitudes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length() {
        let analyzer = SpectrumAnalyzer::new(1024);
        assert_eq!(analyzer.window_size(), 1024);
        let spectrum = analyzer.magnitudes(&vec![0.0; 1024]);
        assert_eq!(spectrum.len(), 513);
    }

    #[test]
    fn test_silence_yields_zero_spectrum() {
        let analyzer = SpectrumAnalyzer::new(1024);
        let spectrum = analyzer.magnitudes(&vec![0.0; 1024]);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_sine_peaks_at_expected_bin() {
        // 1024-sample window at 44100 Hz: bin width ~43.07 Hz.
        // A sine at exactly bin 32 (1378.125 Hz) concentrates there.
        let window_size = 1024;
        let sample_rate = 44100.0;
        let bin = 32;
        let frequency = bin as f32 * sample_rate / window_size as f32;

        let samples: Vec<f32> = (0..window_size)
            .map(|i| (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate).sin())
            .collect();

        let analyzer = SpectrumAnalyzer::new(window_size);
        let spectrum = analyzer.magnitudes(&samples);

        let max_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(max_bin, bin);
    }

    #[test]
    fn test_magnitudes_are_non_negative() {
        let samples: Vec<f32> = (0..512).map(|i| ((i * 7919) % 101) as f32 / 50.5 - 1.0).collect();
        let analyzer = SpectrumAnalyzer::new(512);
        assert!(analyzer.magnitudes(&samples).iter().all(|&m| m >= 0.0));
    }

    #[test]
    #[should_panic]
    fn test_length_mismatch_panics() {
        let analyzer = SpectrumAnalyzer::new(1024);
        let _ = analyzer.magnitudes(&vec![0.0; 512]);
    }
}
