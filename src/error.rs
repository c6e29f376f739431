//! Error types for the feature extraction engine

use std::fmt;

/// Errors that can occur during feature extraction and tracking setup
#[derive(Debug, Clone)]
pub enum FeatureError {
    /// Invalid input data (e.g. a reference onset with a note outside the
    /// representable range)
    InvalidInput(String),

    /// Invalid configuration parameters
    InvalidConfiguration(String),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            FeatureError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for FeatureError {}
