//! Score-position tracking
//!
//! Aligns a live stream of network predictions to a known reference
//! sequence of note onsets:
//! - Reference onset events loaded once before tracking begins
//! - A stateful [`Tracker`] that re-anchors its cursor on each completed
//!   onset event

pub mod tracker;

use serde::{Deserialize, Serialize};

pub use tracker::Tracker;

/// A reference onset event: the start of one or more simultaneously played
/// notes, used as ground truth for alignment
///
/// Onsets are loaded once and never mutated during a tracking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Onset {
    /// Start position in score/beat units
    pub start: f32,

    /// Wall-clock time in seconds
    pub wall_time: f32,

    /// MIDI note numbers sounding at this onset
    pub notes: Vec<u32>,
}
