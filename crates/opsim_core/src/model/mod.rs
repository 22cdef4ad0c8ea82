//! Data model for loaded OpSim output.
//!
//! # Responsibility
//! - Define the tables, selectors and proposal mapping shared by sources,
//!   classifier and loader.
//! - Keep storage details out of the model types.
//!
//! # Invariants
//! - Loaded tables are plain values; nothing here holds a connection.

pub mod proposal;
pub mod subset;
pub mod summary;
pub mod table;
pub mod value;
