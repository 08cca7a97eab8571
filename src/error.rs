//! Error types for the letter perceptron library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Vector or matrix dimensions disagree.
    ///
    /// Shapes are reported as `(rows, cols)`; vectors use `(len, 1)`.
    #[error("invalid shape in {op}: expected {expected:?}, got {actual:?}")]
    InvalidShape {
        op: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Malformed network sizes or training hyperparameters
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Sample features or label rejected at construction
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// File name does not carry a letter label
    #[error("cannot derive label: {0}")]
    Label(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bitmap decoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl NetworkError {
    pub(crate) fn vec_shape(op: &'static str, expected: usize, actual: usize) -> Self {
        NetworkError::InvalidShape {
            op,
            expected: (expected, 1),
            actual: (actual, 1),
        }
    }
}
