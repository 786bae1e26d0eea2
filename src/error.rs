//! Error types for the label composer
//!
//! The composing pipeline itself never fails. These errors only surface at the
//! host-facing edges: decoding uploaded images, loading configuration, reading
//! a host form page and talking to an identity provider.

use thiserror::Error;

/// Result type alias for fallible host-side operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the core label pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Image bytes could not be turned into a nutrition image
    #[error("Image decoding failed: {0}")]
    ImageDecodeError(String),

    /// The uploaded file is neither PNG nor JPEG
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Host form page could not be read
    #[error("Form read failed: {0}")]
    FormError(String),

    /// Identity provider rejected a sign-in
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
