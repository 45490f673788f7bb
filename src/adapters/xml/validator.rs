//! XIP v7 envelope validator
//!
//! Checks well-formedness and the root element contract of composed
//! envelopes. Full XSD validation runs behind the same trait in deployments
//! that ship the schema files; the pipeline treats any failure identically.

use super::EnvelopeValidator;
use crate::domain::errors::ArcaError;
use crate::domain::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Namespace of the XIP v7 envelope schema
pub const XIP_NAMESPACE: &str = "http://preservica.com/XIP/v7.0";

/// Validator for composed XIP envelopes
#[derive(Debug, Default, Clone)]
pub struct XipValidator;

impl XipValidator {
    pub fn new() -> Self {
        Self
    }
}

impl EnvelopeValidator for XipValidator {
    fn validate(&self, xml: &str) -> Result<()> {
        let mut reader = Reader::from_str(xml);
        let mut root_seen = false;
        let mut depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if depth == 0 {
                        check_root(&e)?;
                        root_seen = true;
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) => {
                    if depth == 0 {
                        check_root(&e)?;
                        root_seen = true;
                    }
                }
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ArcaError::Schema(format!(
                        "Envelope is not well-formed at position {}: {e}",
                        reader.buffer_position()
                    )))
                }
            }
        }

        if !root_seen {
            return Err(ArcaError::Schema("Envelope has no root element".to_string()));
        }

        Ok(())
    }
}

fn check_root(e: &quick_xml::events::BytesStart<'_>) -> Result<()> {
    if e.local_name().as_ref() != b"XIP" {
        return Err(ArcaError::Schema(format!(
            "Envelope root must be XIP, got '{}'",
            String::from_utf8_lossy(e.name().as_ref())
        )));
    }

    let has_namespace = e.attributes().flatten().any(|attr| {
        attr.key.as_ref() == b"xmlns" && attr.value.as_ref() == XIP_NAMESPACE.as_bytes()
    });
    if !has_namespace {
        return Err(ArcaError::Schema(format!(
            "Envelope root must declare xmlns=\"{XIP_NAMESPACE}\""
        )));
    }

    Ok(())
}
