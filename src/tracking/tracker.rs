//! Onset tracker
//!
//! Holds a cursor into a reference onset sequence and re-synchronizes it
//! using the note-detection network's live outputs. Realignment happens
//! exactly once per completed onset event, at the moment the onset
//! probability decays back below threshold (a falling edge): the note
//! activation patterns of the next few reference onsets are compared
//! against the network's current note predictions, and the cursor jumps to
//! the best match. Raw onset timing alone is too noisy near event
//! boundaries to be trusted directly.

use crate::config::FeatureConfig;
use crate::error::FeatureError;
use crate::tracking::Onset;

/// Euclidean distance between two equal-length vectors
fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Stateful cursor into a reference onset sequence
///
/// `update` calls must be applied strictly in the temporal order the
/// underlying audio frames were produced; falling-edge detection depends
/// on the immediately preceding call's observed value. One tracker per
/// stream; instances are not meant to be shared.
pub struct Tracker {
    config: FeatureConfig,

    /// Reference onsets, validated against the representable note range at
    /// construction
    onsets: Vec<Onset>,

    /// Current cursor index into the onset sequence
    index: usize,

    /// Current tempo in beats per second, externally settable
    pub tempo: f32,

    /// The previous frame's onset-probability observation
    last_onset_value: f32,
}

impl Tracker {
    /// Create a tracker over a reference onset sequence
    ///
    /// Validates every onset note against the configured representable
    /// range up front so that label construction during tracking can never
    /// fail.
    ///
    /// # Errors
    ///
    /// Returns `FeatureError::InvalidConfiguration` for an invalid
    /// configuration, or `FeatureError::InvalidInput` if any onset contains
    /// a note outside the representable range.
    pub fn new(onsets: Vec<Onset>, config: FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;

        for (i, onset) in onsets.iter().enumerate() {
            for &note in &onset.notes {
                if !config.note_range.contains(&note) {
                    return Err(FeatureError::InvalidInput(format!(
                        "Onset {} contains note {} outside representable range {}..={}",
                        i,
                        note,
                        config.note_range.start(),
                        config.note_range.end()
                    )));
                }
            }
        }

        log::debug!("Tracker initialized with {} reference onsets", onsets.len());

        Ok(Self {
            config,
            onsets,
            index: 0,
            tempo: 1.0,
            last_onset_value: 0.0,
        })
    }

    /// Current cursor index into the onset sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// The previous frame's onset-probability observation
    pub fn last_onset_value(&self) -> f32 {
        self.last_onset_value
    }

    /// Start tracking from a known position and tempo
    ///
    /// # Arguments
    ///
    /// * `position` - The current cursor position as an index into the
    ///   onset sequence
    /// * `tempo` - The song's current tempo in beats per second
    pub fn start(&mut self, position: usize, tempo: f32) {
        self.index = position;
        self.tempo = tempo;
        self.last_onset_value = 0.0;
    }

    /// Update with the network's output for one frame
    ///
    /// `onset` is the frame's onset probability, `notes` the note
    /// prediction vector (one value per representable note). Realignment
    /// only triggers on a falling edge: the previous observation at or
    /// above threshold and the current one at or below it. Every other call
    /// is a no-op aside from recording the observation.
    ///
    /// # Returns
    ///
    /// The new cursor index when the cursor moved, `None` otherwise.
    pub fn update(&mut self, onset: f32, notes: &[f32]) -> Option<usize> {
        let previous = self.last_onset_value;
        self.last_onset_value = onset;

        if previous < self.config.onset_threshold || onset > self.config.onset_threshold {
            return None;
        }

        // Falling edge: compare nearby reference onsets against the
        // current note predictions and jump to the best match.
        let mut min_distance: Option<f32> = None;
        let mut offset = 0;

        for i in 0..=self.config.lookahead {
            if self.index + i >= self.onsets.len() {
                break;
            }

            let label = self.label_for_onset(&self.onsets[self.index + i]);
            let distance = euclidean(&label, notes) * self.config.offset_weights[i];

            if min_distance.map_or(true, |min| distance < min) {
                min_distance = Some(distance);
                offset = i;
            }
        }

        if offset != 0 {
            self.index += offset;
            log::debug!("Cursor realigned by {} to onset {}", offset, self.index);
            return Some(self.index);
        }

        None
    }

    /// Whether a beat-unit position falls within half a window of the
    /// nearest reference onset's wall time
    ///
    /// Estimates the local tempo from the closest onset and its successor
    /// (wrapping to the first onset when the closest is the last), converts
    /// the query position to wall time at that tempo, and checks the
    /// distance against `window_size / 2 / sampling_frequency` seconds.
    /// Returns `false` for an empty onset sequence, and `false` when the
    /// local tempo estimate is degenerate (the paired onsets share a wall
    /// time, or the estimate is zero beats per second).
    pub fn close_to_onset(&self, beat: f32) -> bool {
        if self.onsets.is_empty() {
            return false;
        }

        let mut closest_index = 0;
        let mut closest_distance = f32::INFINITY;
        for (i, onset) in self.onsets.iter().enumerate() {
            let distance = (onset.start - beat).abs();
            if distance < closest_distance {
                closest_distance = distance;
                closest_index = i;
            }
        }

        let closest = &self.onsets[closest_index];
        let other_index = if closest_index == self.onsets.len() - 1 {
            0
        } else {
            closest_index + 1
        };
        let other = &self.onsets[other_index];

        let wall_delta = closest.wall_time - other.wall_time;
        if wall_delta == 0.0 {
            return false;
        }
        let beats_per_second = (closest.start - other.start) / wall_delta;
        if beats_per_second == 0.0 {
            return false;
        }

        let time_distance = (closest.wall_time - beat / beats_per_second).abs();
        time_distance <= self.config.window_size as f32 / 2.0 / self.config.sampling_frequency
    }

    /// Build the label vector for a reference onset
    ///
    /// Zero everywhere except 1.0 at each sounding note's position within
    /// the representable range. Notes were validated at construction.
    fn label_for_onset(&self, onset: &Onset) -> Vec<f32> {
        let mut label = vec![0.0; self.config.note_count()];
        let start = *self.config.note_range.start();
        for &note in &onset.notes {
            label[(note - start) as usize] = 1.0;
        }
        label
    }
}
