//! Errors raised while exporting or loading a tier manifest.

use thiserror::Error;

/// A tier manifest could not be encoded or decoded.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Encoding a manifest to JSON or bincode failed
    #[error("Failed to encode tier manifest: {0}")]
    SerializationFailed(String),

    /// The input is not a well-formed tier manifest
    #[error("Failed to decode tier manifest: {0}")]
    DeserializationFailed(String),

    /// The manifest was written by a different tier manifest format
    #[error("Unsupported tier manifest format {found}, this build reads format {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
