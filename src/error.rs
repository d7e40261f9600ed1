//! use homelab_ca::error::CaError;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaError>;

/// Represents errors that can occur while creating the CA, issuing
/// certificates or handling artifacts.
///
/// Every variant is terminal for the current request; nothing is retried.
#[derive(Debug, Error, Clone)]
pub enum CaError {
    /// The requested key algorithm identifier is not one we can generate.
    #[error("Unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A host name or file name failed the safe-name check.
    #[error("Unsafe identifier: {0:?}")]
    UnsafeIdentifier(String),

    /// Leaf issuance was attempted before a CA was created.
    #[error("CA not initialized: {} does not exist", path.display())]
    CaNotInitialized { path: PathBuf },

    /// The CA files exist but could not be parsed.
    #[error("CA material is corrupt: {0}")]
    CaCorrupt(String),

    /// A download was requested for a file that does not exist.
    #[error("Artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// A download was requested for the CA private key.
    #[error("Refusing to serve {0}")]
    ForbiddenArtifact(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Filesystem error, with the path that was being accessed.
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Coarse classification of [`CaError`], for callers that map errors to
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedAlgorithm,
    UnsafeIdentifier,
    CaNotInitialized,
    CaCorrupt,
    ArtifactNotFound,
    ForbiddenArtifact,
    Internal,
}

impl CaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaError::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            CaError::UnsafeIdentifier(_) => ErrorKind::UnsafeIdentifier,
            CaError::CaNotInitialized { .. } => ErrorKind::CaNotInitialized,
            CaError::CaCorrupt(_) => ErrorKind::CaCorrupt,
            CaError::ArtifactNotFound { .. } => ErrorKind::ArtifactNotFound,
            CaError::ForbiddenArtifact(_) => ErrorKind::ForbiddenArtifact,
            CaError::InvalidInput(_)
            | CaError::KeyGenerationError(_)
            | CaError::EncodingError(_)
            | CaError::DecodingError(_)
            | CaError::Io { .. } => ErrorKind::Internal,
        }
    }

    /// Wraps an I/O error together with the path it happened on.
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        CaError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<der::Error> for CaError {
    /// Converts a `der::Error` into a `CaError`.
    fn from(err: der::Error) -> Self {
        CaError::EncodingError(err.to_string())
    }
}

impl From<rsa::Error> for CaError {
    fn from(err: rsa::Error) -> Self {
        CaError::KeyGenerationError(err.to_string())
    }
}

impl From<pkcs8::Error> for CaError {
    fn from(err: pkcs8::Error) -> Self {
        CaError::DecodingError(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for CaError {
    fn from(err: pkcs8::spki::Error) -> Self {
        CaError::EncodingError(err.to_string())
    }
}
