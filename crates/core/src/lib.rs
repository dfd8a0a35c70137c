//! Domain logic for the docshelf category hierarchy.
//!
//! Everything here is pure: no I/O, no async. The `db` and `api` crates
//! feed snapshots of stored state into these functions and persist the
//! results.

pub mod category;
pub mod error;
pub mod hierarchy;
pub mod stats;
pub mod style;
pub mod types;
