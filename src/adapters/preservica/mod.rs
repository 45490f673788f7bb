//! Upstream preservation API adapter
//!
//! The [`EntityClient`] trait is the seam the pipeline depends on;
//! [`RestEntityClient`] is the production implementation.

pub mod client;
pub mod models;
pub mod rest;

pub use client::EntityClient;
pub use rest::RestEntityClient;
