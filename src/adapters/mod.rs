//! External integrations
//!
//! Each adapter owns one outside concern behind a trait: the upstream
//! preservation API, the source queue, the event topic, envelope
//! validation, and the local OCFL repository.

pub mod events;
pub mod ocfl;
pub mod preservica;
pub mod queue;
pub mod xml;
