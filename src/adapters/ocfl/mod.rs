//! Local store: OCFL repository adapter
//!
//! A filesystem-only versioned object store. Objects live under hashed
//! n-tuple paths, each with a pretty-printed JSON inventory; files are
//! content-addressed by SHA-256 so identical payloads are stored once
//! across versions.

pub mod inventory;
pub mod layout;
pub mod repository;

pub use inventory::Inventory;
pub use layout::HashedNTupleLayout;
pub use repository::{Classification, OcflRepository};
