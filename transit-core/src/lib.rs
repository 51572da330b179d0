//! Cache and normalization core for the transit tracker.
//!
//! Fronts the bus and train agency APIs with a short-lived TTL cache and
//! converts their payload shapes (distinct field names, distinct nesting)
//! into one normalized domain model, so downstream consumers never see
//! agency-specific schemas.

pub mod bus;
pub mod cache;
pub mod domain;
pub mod error;
pub mod keys;
pub mod status;
pub mod train;
