//! Result type alias for the crate

use crate::domain::errors::ArcaError;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ArcaError>;
