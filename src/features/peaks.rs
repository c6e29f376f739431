//! Spectral peak extraction
//!
//! Peak extraction is a capability the feature pipeline depends on
//! abstractly: given frequency/magnitude points and the window RMS, return
//! the spectral peaks worth describing. [`ThresholdPeakExtractor`] is the
//! reference implementation; tests substitute stubs.

use crate::features::frequency::freq_to_note;

/// A frequency/magnitude point in a spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Frequency in Hz
    pub x: f32,
    /// Magnitude
    pub y: f32,
}

/// Capability interface for spectral peak extraction
pub trait PeakExtractor {
    /// Extract peaks from frequency/magnitude points
    ///
    /// `rms` is the root-mean-square level of the window the points were
    /// computed from; implementations may use it to scale their cutoff.
    /// Returning no peaks is a valid result, not an error.
    fn extract(&self, points: &[Point], rms: f32) -> Vec<Point>;
}

/// Reference peak extractor: height cutoff plus greedy minimum-distance
/// peak picking
///
/// # Algorithm
///
/// 1. Find all local maxima (`y` above both neighbors)
/// 2. Keep maxima above `rms * height_cutoff_multiplier`
/// 3. Sort by magnitude, highest first
/// 4. Greedily keep peaks at least `minimum_note_distance` notes apart,
///    preferring the higher peak
#[derive(Debug, Clone)]
pub struct ThresholdPeakExtractor {
    /// Height cutoff as a multiplier of the window RMS
    pub height_cutoff_multiplier: f32,

    /// Minimum distance between kept peaks, in notes
    pub minimum_note_distance: f32,
}

impl ThresholdPeakExtractor {
    /// Create a peak extractor with the given cutoff and spacing
    pub fn new(height_cutoff_multiplier: f32, minimum_note_distance: f32) -> Self {
        Self {
            height_cutoff_multiplier,
            minimum_note_distance,
        }
    }
}

impl PeakExtractor for ThresholdPeakExtractor {
    fn extract(&self, points: &[Point], rms: f32) -> Vec<Point> {
        if points.len() < 3 {
            return vec![];
        }

        let cutoff = rms * self.height_cutoff_multiplier;

        let mut peaks: Vec<Point> = Vec::new();
        for i in 1..(points.len() - 1) {
            let point = points[i];
            if point.y > points[i - 1].y && point.y > points[i + 1].y && point.y > cutoff {
                peaks.push(point);
            }
        }

        // Highest first; stable so equal heights keep spectrum order
        peaks.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));

        let mut kept: Vec<Point> = Vec::new();
        for peak in peaks {
            let note = freq_to_note(peak.x);
            let too_close = kept
                .iter()
                .any(|k| (freq_to_note(k.x) - note).abs() < self.minimum_note_distance);
            if !too_close {
                kept.push(peak);
            }
        }

        log::debug!("Extracted {} peaks (cutoff {:.6})", kept.len(), cutoff);

        kept
    }
}
