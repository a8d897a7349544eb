//! Snippet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide upsert, exact lookup, key enumeration and substring search over
//!   the `snippets` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every operation runs in exactly one transaction; it commits on success and
//!   rolls back (on drop) on any failure.
//! - `put` leaves either the inserted row or the updated row committed, never
//!   neither and never a partial write.
//! - Listing and search results are ordered by `keyword ASC` (byte order).

use crate::db::DbError;
use crate::model::snippet::{Snippet, SnippetValidationError};
use crate::search::substring::{SubstringQuery, CONTAINS_FUNCTION};
use rusqlite::{ffi, params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snippet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(SnippetValidationError),
    Db(DbError),
    NotFound(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(keyword) => write!(f, "snippet not found: `{keyword}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted snippet data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SnippetValidationError> for RepoError {
    fn from(value: SnippetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for snippet operations.
pub trait SnippetRepository {
    /// Inserts `keyword`, or replaces its message when it already exists.
    fn put(&mut self, keyword: &str, message: &str) -> RepoResult<Snippet>;
    /// Gets the snippet stored under exactly `keyword`.
    fn get(&mut self, keyword: &str) -> RepoResult<Snippet>;
    /// Returns every stored keyword in ascending order.
    fn list_keys(&mut self) -> RepoResult<Vec<String>>;
    /// Returns snippets whose message contains the query text, ignoring case.
    fn search(&mut self, query: &SubstringQuery) -> RepoResult<Vec<Snippet>>;
}

/// Result of the insert attempt inside `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertOutcome {
    Inserted,
    KeywordTaken,
}

/// SQLite-backed snippet repository.
pub struct SqliteSnippetRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteSnippetRepository<'conn> {
    /// Constructs a repository from a connection returned by `open_db` or
    /// `open_db_in_memory`, which registers the search function.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SnippetRepository for SqliteSnippetRepository<'_> {
    fn put(&mut self, keyword: &str, message: &str) -> RepoResult<Snippet> {
        let snippet = Snippet::new(keyword, message);
        snippet.validate()?;

        let mut tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if insert_in_savepoint(&mut tx, &snippet)? == InsertOutcome::KeywordTaken {
            let changed = tx.execute(
                "UPDATE snippets
                 SET message = ?1
                 WHERE keyword = ?2;",
                params![snippet.message.as_str(), snippet.keyword.as_str()],
            )?;
            if changed != 1 {
                return Err(RepoError::InvalidData(format!(
                    "expected one row for keyword `{}` after uniqueness conflict, updated {changed}",
                    snippet.keyword
                )));
            }
        }

        tx.commit()?;
        Ok(snippet)
    }

    fn get(&mut self, keyword: &str) -> RepoResult<Snippet> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Deferred)?;
        let found = {
            let mut stmt = tx.prepare(
                "SELECT keyword, message
                 FROM snippets
                 WHERE keyword = ?1;",
            )?;
            let mut rows = stmt.query([keyword])?;
            match rows.next()? {
                Some(row) => Some(parse_snippet_row(row)?),
                None => None,
            }
        };
        tx.commit()?;

        found.ok_or_else(|| RepoError::NotFound(keyword.to_string()))
    }

    fn list_keys(&mut self) -> RepoResult<Vec<String>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Deferred)?;
        let keys = {
            let mut stmt = tx.prepare("SELECT keyword FROM snippets ORDER BY keyword ASC;")?;
            let mut rows = stmt.query([])?;
            let mut keys = Vec::new();
            while let Some(row) = rows.next()? {
                keys.push(row.get::<_, String>("keyword")?);
            }
            keys
        };
        tx.commit()?;
        Ok(keys)
    }

    fn search(&mut self, query: &SubstringQuery) -> RepoResult<Vec<Snippet>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Deferred)?;
        let hits = {
            let mut stmt = tx.prepare(&format!(
                "SELECT keyword, message
                 FROM snippets
                 WHERE {CONTAINS_FUNCTION}(message, ?1)
                 ORDER BY keyword ASC;"
            ))?;
            let mut rows = stmt.query([query.text.as_str()])?;
            let mut hits = Vec::new();
            while let Some(row) = rows.next()? {
                hits.push(parse_snippet_row(row)?);
            }
            hits
        };
        tx.commit()?;
        Ok(hits)
    }
}

/// Attempts the insert inside a savepoint so a uniqueness conflict can be
/// rolled back without abandoning the enclosing transaction.
fn insert_in_savepoint(tx: &mut Transaction<'_>, snippet: &Snippet) -> RepoResult<InsertOutcome> {
    let mut savepoint = tx.savepoint()?;
    let inserted = savepoint.execute(
        "INSERT INTO snippets (keyword, message) VALUES (?1, ?2);",
        params![snippet.keyword.as_str(), snippet.message.as_str()],
    );

    match inserted {
        Ok(_) => {
            savepoint.commit()?;
            Ok(InsertOutcome::Inserted)
        }
        Err(err) if is_uniqueness_conflict(&err) => {
            savepoint.rollback()?;
            Ok(InsertOutcome::KeywordTaken)
        }
        Err(err) => Err(err.into()),
    }
}

fn is_uniqueness_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

// Keyword rules apply to writes only; rows from other writers are returned as stored.
fn parse_snippet_row(row: &Row<'_>) -> RepoResult<Snippet> {
    Ok(Snippet {
        keyword: row.get("keyword")?,
        message: row.get("message")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "snippets")? {
        return Err(RepoError::MissingRequiredTable("snippets"));
    }

    for column in ["keyword", "message"] {
        if !table_has_column(conn, "snippets", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "snippets",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM pragma_table_info(?1)
            WHERE name = ?2
        );",
        params![table, column],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
