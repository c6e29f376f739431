//! Feature extraction modules
//!
//! This module contains the spectral feature pipeline:
//! - Frequency mapping (note number to Hz)
//! - Magnitude spectrum computation
//! - Band aggregation
//! - Peak extraction (capability + reference implementation)
//! - Feature assembly

pub mod bands;
pub mod builder;
pub mod frequency;
pub mod peaks;
pub mod spectrum;
