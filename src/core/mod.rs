//! Business logic
//!
//! The reconciliation pipeline proper: message resolution, envelope
//! composition, destination path planning, staging transfer, and the batch
//! coordinator tying them together.

pub mod compose;
pub mod paths;
pub mod pipeline;
pub mod resolve;
pub mod stage;
