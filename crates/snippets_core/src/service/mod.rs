//! Use-case services over repository contracts.
//!
//! # Responsibility
//! - Expose the operations CLI callers dispatch to.
//! - Attach operation context to persistence errors.

pub mod snippet_service;
