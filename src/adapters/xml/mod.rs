//! Envelope validation adapter
//!
//! Schema validation of composed envelopes is an external concern behind the
//! [`EnvelopeValidator`] trait; [`XipValidator`] is the in-process
//! implementation.

pub mod validator;

use crate::domain::Result;

pub use validator::{XipValidator, XIP_NAMESPACE};

/// Trait for XML-against-schema validation of composed envelopes
pub trait EnvelopeValidator: Send + Sync {
    /// Validate a serialized envelope; any failure is fatal for the batch
    fn validate(&self, xml: &str) -> Result<()>;
}
