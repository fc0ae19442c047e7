//! Error types for the image fusion workspace.

use thiserror::Error;

use crate::pixel::PixelType;

/// Result type alias using FusionError.
pub type FusionResult<T> = Result<T, FusionError>;

/// Errors raised by the stores, the dispatch helper and fusors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FusionError {
    // === Lookup Errors ===
    /// No element exists under the requested (partial) key.
    ///
    /// Both fields are `None` when an unkeyed lookup hit an empty store.
    #[error("no element found for {}", describe_key(.tag, .date))]
    NotFound {
        tag: Option<String>,
        date: Option<i32>,
    },

    // === Dispatch Errors ===
    /// A discriminant has no branch in the dispatch table.
    #[error("unsupported discriminant: {0}")]
    UnsupportedDiscriminant(String),

    // === Image Errors ===
    #[error("pixel type mismatch: expected {expected}, found {actual}")]
    PixelTypeMismatch {
        expected: PixelType,
        actual: PixelType,
    },

    #[error("invalid image dimensions: {0}")]
    InvalidDimensions(String),

    #[error("position {requested} is outside image bounds {bounds}")]
    OutOfBounds { requested: String, bounds: String },

    // === Fusor Errors ===
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    ConfigError(String),
}

fn describe_key(tag: &Option<String>, date: &Option<i32>) -> String {
    match (tag, date) {
        (Some(tag), Some(date)) => format!("tag '{}' at date {}", tag, date),
        (Some(tag), None) => format!("tag '{}'", tag),
        (None, Some(date)) => format!("date {}", date),
        (None, None) => "any key (store is empty)".to_string(),
    }
}

impl FusionError {
    /// Create a NotFound error for a (tag, date) pair.
    pub fn not_found_pair(tag: impl Into<String>, date: i32) -> Self {
        Self::NotFound {
            tag: Some(tag.into()),
            date: Some(date),
        }
    }

    /// Create a NotFound error for a missing tag.
    pub fn not_found_tag(tag: impl Into<String>) -> Self {
        Self::NotFound {
            tag: Some(tag.into()),
            date: None,
        }
    }

    /// Create a NotFound error for a missing date.
    pub fn not_found_date(date: i32) -> Self {
        Self::NotFound {
            tag: None,
            date: Some(date),
        }
    }

    /// Create a NotFound error for a lookup on an empty store.
    pub fn empty_store() -> Self {
        Self::NotFound {
            tag: None,
            date: None,
        }
    }

    /// Create an UnsupportedDiscriminant error.
    pub fn unsupported(discriminant: impl Into<String>) -> Self {
        Self::UnsupportedDiscriminant(discriminant.into())
    }

    /// Create an OutOfBounds error.
    pub fn out_of_bounds(requested: impl Into<String>, bounds: impl Into<String>) -> Self {
        Self::OutOfBounds {
            requested: requested.into(),
            bounds: bounds.into(),
        }
    }

    /// Create an InvalidOptions error.
    pub fn invalid_options(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }

    /// Create a PredictionFailed error.
    pub fn prediction_failed(msg: impl Into<String>) -> Self {
        Self::PredictionFailed(msg.into())
    }

    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Whether this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
