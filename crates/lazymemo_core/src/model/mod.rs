//! Domain model for memos.
//!
//! # Responsibility
//! - Define the data records passed between callers and the store.
//!
//! # Invariants
//! - Model values are transient request/response payloads, never cached
//!   state.

pub mod memo;
