//! Substring search helpers.
//!
//! # Responsibility
//! - Define the caller-facing search request.
//! - Own the case-folded containment rule and its SQL function binding.

pub mod substring;
