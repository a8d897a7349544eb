//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snippet data access contract.
//! - Isolate SQLite query details from service/CLI orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Snippet::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Caller-supplied values are always bound as statement parameters.

pub mod snippet_repo;
