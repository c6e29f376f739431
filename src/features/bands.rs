//! Band aggregation
//!
//! Folds a magnitude spectrum into one energy value per musical note over a
//! configured note range. Spectrum bins that straddle a band edge are split
//! between the neighboring bands by the fraction of the bin lying inside
//! each band.
//!
//! # Algorithm
//!
//! For each band note `n`, with bin width `fb`:
//!
//! 1. Band edges in bins: `lower_bin = freq(n - s/2) / fb`,
//!    `upper_bin = freq(n + s/2) / fb` where `s` is the band size in notes.
//! 2. Whole bins `ceil(lower_bin) ..= floor(upper_bin)` are summed.
//! 3. The bin below the band contributes `1 - (lower_index - lower_bin)`
//!    of its magnitude; the bin above contributes `upper_bin - upper_index`.
//!
//! Bands narrower than one bin have no whole bins and receive only the
//! fractional contributions. Bands whose bins fall outside the spectrum
//! are exactly zero.

use std::ops::RangeInclusive;

use crate::features::frequency::note_to_freq;

/// Aggregate a magnitude spectrum into per-note band values
///
/// # Arguments
///
/// * `spectrum` - Magnitude values, one per non-negative-frequency bin
/// * `base_frequency` - Bin width in Hz (`sampling_frequency / window_size`)
/// * `notes` - Band note range, inclusive
/// * `band_size` - Band resolution in notes
///
/// # Returns
///
/// One value per band note, in ascending note order.
pub fn band_spectrum(
    spectrum: &[f32],
    base_frequency: f32,
    notes: &RangeInclusive<u32>,
    band_size: f32,
) -> Vec<f32> {
    let start = *notes.start() as f32;
    let span = (*notes.end() - *notes.start()) as f32;
    let count = (span / band_size).floor() as usize + 1;

    log::debug!(
        "Aggregating {} spectrum bins into {} bands over notes {}..={}, band_size={:.2}",
        spectrum.len(),
        count,
        notes.start(),
        notes.end(),
        band_size
    );

    let mut bands = Vec::with_capacity(count);

    for slot in 0..count {
        let note = start + slot as f32 * band_size;

        let lower_bin = note_to_freq(note - band_size / 2.0) / base_frequency;
        let lower_index = lower_bin.ceil() as usize;

        let upper_bin = note_to_freq(note + band_size / 2.0) / base_frequency;
        let upper_index = upper_bin.floor() as usize;

        let mut value = 0.0;
        if lower_index <= upper_index && lower_index < spectrum.len() {
            let end = upper_index.min(spectrum.len() - 1);
            for &bin in &spectrum[lower_index..=end] {
                value += bin;
            }
        }

        // Fraction of the bin below the band lying above the lower cutoff
        if lower_index > 0 && lower_index - 1 < spectrum.len() {
            let lower_weight = 1.0 - (lower_index as f32 - lower_bin);
            value += spectrum[lower_index - 1] * lower_weight;
        }

        // Fraction of the bin above the band lying below the upper cutoff
        if upper_index + 1 < spectrum.len() {
            let upper_weight = upper_bin - upper_index as f32;
            value += spectrum[upper_index + 1] * upper_weight;
        }

        bands.push(value);
    }

    log::debug!(
        "Aggregated {} bands, total energy {:.6}",
        bands.len(),
        bands.iter().sum::<f32>()
    );

    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_FREQUENCY: f32 = 44100.0 / 8192.0;

    fn default_bands(spectrum: &[f32]) -> Vec<f32> {
        band_spectrum(spectrum, BASE_FREQUENCY, &(24..=120), 1.0)
    }

    #[test]
    fn test_zero_spectrum_yields_zero_bands() {
        let spectrum = vec![0.0; 4097];
        let bands = default_bands(&spectrum);
        assert_eq!(bands.len(), 97);
        assert!(bands.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_impulse_lands_in_matching_band() {
        // A4 at 440 Hz: bin 440 / (44100/8192) ~= 81.7, so bin 82
        let mut spectrum = vec![0.0; 4097];
        spectrum[82] = 1.0;

        let bands = default_bands(&spectrum);
        let a4_slot = (69 - 24) as usize;
        assert!(
            bands[a4_slot] > 0.0,
            "Band for note 69 should capture energy at 440 Hz, got {:?}",
            bands[a4_slot]
        );
    }

    #[test]
    fn test_impulse_affects_at_most_adjacent_bands() {
        // A single bin can straddle at most one band edge, so a unit
        // impulse shows up in at most two neighboring bands.
        for bin in [50, 82, 200, 1000] {
            let mut spectrum = vec![0.0; 4097];
            spectrum[bin] = 1.0;

            let bands = default_bands(&spectrum);
            let nonzero: Vec<usize> = bands
                .iter()
                .enumerate()
                .filter(|(_, &b)| b > 0.0)
                .map(|(i, _)| i)
                .collect();

            assert!(
                nonzero.len() <= 2,
                "Impulse at bin {} spread into bands {:?}",
                bin,
                nonzero
            );
            if nonzero.len() == 2 {
                assert_eq!(nonzero[1], nonzero[0] + 1);
            }
        }
    }

    #[test]
    fn test_shifting_impulse_only_moves_adjacent_contributions() {
        let mut a = vec![0.0; 4097];
        let mut b = vec![0.0; 4097];
        a[300] = 1.0;
        b[301] = 1.0;

        let bands_a = default_bands(&a);
        let bands_b = default_bands(&b);

        let changed: Vec<usize> = bands_a
            .iter()
            .zip(bands_b.iter())
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .map(|(i, _)| i)
            .collect();

        if let (Some(&first), Some(&last)) = (changed.first(), changed.last()) {
            assert!(
                last - first <= 2,
                "One-bin shift changed non-neighboring bands: {:?}",
                changed
            );
        }
    }

    #[test]
    fn test_band_narrower_than_one_bin() {
        // With a very small window the bin width exceeds low bands entirely:
        // 44100 / 256 ~= 172 Hz per bin, note 24 spans ~2 Hz.
        let spectrum = vec![1.0; 129];
        let bands = band_spectrum(&spectrum, 44100.0 / 256.0, &(24..=48), 1.0);
        assert_eq!(bands.len(), 25);
        // No whole bins inside the band, only fractional edge contributions,
        // which must stay finite and non-negative.
        assert!(bands.iter().all(|&b| b.is_finite() && b >= 0.0));
    }

    #[test]
    fn test_bands_outside_spectrum_are_zero() {
        // Truncated spectrum: high bands have no contributing bins.
        let spectrum = vec![1.0; 16];
        let bands = default_bands(&spectrum);
        let last = bands.len() - 1;
        assert_eq!(bands[last], 0.0);
    }

    #[test]
    fn test_edge_bin_split_between_bands() {
        // Bin 87 sits near the boundary between notes 69 and 70
        // (A4-A#4 edge at note 69.5 -> 452.9 Hz -> bin ~84.1). Use bin 84.
        let mut spectrum = vec![0.0; 4097];
        spectrum[84] = 1.0;

        let bands = default_bands(&spectrum);
        let a4 = (69 - 24) as usize;
        let a_sharp4 = (70 - 24) as usize;
        let total = bands[a4] + bands[a_sharp4];
        assert!(
            total > 0.0 && total <= 2.0,
            "Edge bin should contribute to the neighboring bands, got {}",
            total
        );
    }
}
