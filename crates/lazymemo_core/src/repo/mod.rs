//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the memo data access contract.
//! - Isolate SQLite query details from the store and service layers.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod memo_repo;
pub mod query;
