//! Case-insensitive literal containment.
//!
//! # Responsibility
//! - Carry caller search text as a `SubstringQuery`.
//! - Register `snippet_contains(message, needle)` on SQLite connections.
//!
//! # Invariants
//! - Caller text is never interpreted as a pattern; every character is literal.
//! - Case folding is Unicode-aware (`str::to_lowercase`) on both sides.
//! - Query text is only ever passed as a bound parameter, never spliced into SQL.

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::Connection;

/// Name of the SQL scalar function used by search statements.
pub const CONTAINS_FUNCTION: &str = "snippet_contains";

/// Caller-facing substring search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringQuery {
    /// Literal text to look for; empty matches every snippet.
    pub text: String,
}

impl SubstringQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns whether `message` contains this query, ignoring case.
    pub fn matches(&self, message: &str) -> bool {
        contains_ignore_case(message, &self.text)
    }
}

/// Returns whether `haystack` contains `needle` after lowercasing both.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Registers `snippet_contains` on `conn`.
///
/// Re-registering replaces the previous definition, so calling this more than
/// once per connection is harmless.
pub fn register_search_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CONTAINS_FUNCTION,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        snippet_contains,
    )
}

fn snippet_contains(ctx: &Context<'_>) -> rusqlite::Result<bool> {
    let haystack = ctx.get_raw(0).as_str().map_err(rusqlite::Error::from)?;
    let needle = ctx.get_raw(1).as_str().map_err(rusqlite::Error::from)?;
    Ok(contains_ignore_case(haystack, needle))
}
