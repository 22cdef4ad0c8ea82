//! Use-case layer: proposal classification and summary loading.
//!
//! # Responsibility
//! - Orchestrate source reads into a validated [`loader::OpSimOutput`].
//! - Keep subset rules independent of the storage backend.

pub mod classifier;
pub mod loader;
