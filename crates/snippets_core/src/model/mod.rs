//! Snippet domain model.
//!
//! # Responsibility
//! - Define the `(keyword, message)` record shared by repository, service and CLI.
//! - Own keyword validation rules.
//!
//! # Invariants
//! - A keyword identifies at most one snippet; it is never rewritten in place.

pub mod snippet;
