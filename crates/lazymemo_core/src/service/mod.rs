//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep route/CLI layers decoupled from storage details.

pub mod memo_service;
