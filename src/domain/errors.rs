//! Domain error types
//!
//! All errors crossing module boundaries are domain-specific; adapter
//! implementations convert third-party errors into these at the seam.

use crate::domain::ids::EntityRef;
use thiserror::Error;

/// Main Arca error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ArcaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream preservation API errors
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Composed metadata failed schema validation
    #[error("Schema error: {0}")]
    Schema(String),

    /// A replication invariant was violated
    #[error("Invariant error: {0}")]
    Invariant(#[from] InvariantError),

    /// OCFL repository or local write failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Event publication failure after commit
    #[error("Notify error: {0}")]
    Notify(String),

    /// Queue receive/delete failure
    #[error("Queue error: {0}")]
    Queue(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors talking to the upstream preservation API
///
/// These errors don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Failed to reach the server
    #[error("Failed to connect to preservation API: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Entity not found
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Response could not be interpreted
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Bitstream transfer failed mid-stream
    #[error("Bitstream transfer failed: {0}")]
    TransferFailed(String),
}

/// Violations of the replication invariants
///
/// Each of these is fatal for the batch: nothing is acknowledged and the
/// queue redelivers the carriers.
#[derive(Debug, Error)]
pub enum InvariantError {
    /// A content object's entity record carries no parent reference
    #[error("Content object {co_ref} has no parent information object")]
    MissingParent { co_ref: EntityRef },

    /// Bitstream filenames of one content object disagree on its identifier
    #[error("Bitstreams of content object {co_ref} resolve to {found} distinct identifiers")]
    BitstreamIdentityMismatch { co_ref: EntityRef, found: usize },

    /// A content object appears in more than one representation group
    #[error("Content object {co_ref} belongs to multiple representation groups: {groups}")]
    MultipleRepresentationGroups { co_ref: EntityRef, groups: String },

    /// An information object's metadata carries no SourceID identifier
    #[error("Information object {io_ref} has no SourceID identifier")]
    MissingSourceId { io_ref: EntityRef },

    /// Two differing payloads target the same destination path in one batch
    #[error("Conflicting payloads for destination path {path}")]
    ConflictingDestination { path: String },
}

/// OCFL repository and local write failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// The repository root is not a usable OCFL storage root
    #[error("Invalid OCFL storage root: {0}")]
    InvalidRoot(String),

    /// An object inventory could not be read or parsed
    #[error("Inventory error: {0}")]
    Inventory(String),

    /// A version commit failed; no partial version is exposed
    #[error("Commit failed: {0}")]
    Commit(String),

    /// A staging or assembly write failed
    #[error("Write failed: {0}")]
    Write(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ArcaError {
    fn from(err: std::io::Error) -> Self {
        ArcaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ArcaError {
    fn from(err: serde_json::Error) -> Self {
        ArcaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ArcaError {
    fn from(err: toml::de::Error) -> Self {
        ArcaError::Configuration(format!("TOML parse error: {err}"))
    }
}
