//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: the JSON file user store
//!
//! Adapters translate between domain types and their storage representation.
//! They contain no business logic.

pub mod persistence;
