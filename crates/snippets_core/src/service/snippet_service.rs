//! Snippet use-case service.
//!
//! # Responsibility
//! - Provide `put`/`get`/`catalog`/`search` entry points for CLI callers.
//! - Translate repository errors into caller-facing outcomes with operation context.
//! - Emit one metadata-only log event per call.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Logs never contain snippet text; only sizes, counts and timings.
//! - The service never terminates the process; callers decide exit behavior.

use crate::model::snippet::{Snippet, SnippetValidationError};
use crate::repo::snippet_repo::{RepoError, SnippetRepository};
use crate::search::substring::SubstringQuery;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Operation names used in logs and storage error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetOperation {
    Put,
    Get,
    Catalog,
    Search,
}

impl SnippetOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Put => "put",
            Self::Get => "get",
            Self::Catalog => "catalog",
            Self::Search => "search",
        }
    }
}

impl Display for SnippetOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service error for snippet use-cases.
#[derive(Debug)]
pub enum SnippetServiceError {
    /// Keyword rejected before touching the store.
    InvalidKeyword {
        keyword: String,
        reason: SnippetValidationError,
    },
    /// No snippet is stored under the keyword. Expected, not a malfunction.
    NotFound { keyword: String },
    /// Any other store failure, fatal for the invocation.
    Storage {
        operation: SnippetOperation,
        keyword: Option<String>,
        source: RepoError,
    },
}

impl SnippetServiceError {
    fn from_repo(operation: SnippetOperation, keyword: Option<&str>, err: RepoError) -> Self {
        match err {
            RepoError::Validation(reason) => Self::InvalidKeyword {
                keyword: keyword.unwrap_or_default().to_string(),
                reason,
            },
            RepoError::NotFound(keyword) => Self::NotFound { keyword },
            other => Self::Storage {
                operation,
                keyword: keyword.map(str::to_string),
                source: other,
            },
        }
    }

    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidKeyword { .. } => "invalid_keyword",
            Self::NotFound { .. } => "not_found",
            Self::Storage { .. } => "storage_failed",
        }
    }
}

impl Display for SnippetServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKeyword { keyword, reason } => {
                write!(f, "invalid keyword `{}`: {reason}", keyword.escape_debug())
            }
            Self::NotFound { keyword } => write!(f, "keyword `{keyword}` not available"),
            Self::Storage {
                operation,
                keyword: Some(keyword),
                source,
            } => write!(f, "{operation} `{keyword}` failed: {source}"),
            Self::Storage {
                operation,
                keyword: None,
                source,
            } => write!(f, "{operation} failed: {source}"),
        }
    }
}

impl Error for SnippetServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKeyword { reason, .. } => Some(reason),
            Self::NotFound { .. } => None,
            Self::Storage { source, .. } => Some(source),
        }
    }
}

pub type SnippetServiceResult<T> = Result<T, SnippetServiceError>;

/// Snippet service facade over repository implementations.
pub struct SnippetService<R: SnippetRepository> {
    repo: R,
}

impl<R: SnippetRepository> SnippetService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores `message` under `keyword`, replacing any previous message.
    ///
    /// Returns the stored pair as written.
    pub fn put(&mut self, keyword: &str, message: &str) -> SnippetServiceResult<Snippet> {
        let started_at = Instant::now();
        let result = self.repo.put(keyword, message);
        match &result {
            Ok(_) => info!(
                "event=snippet_put module=service status=ok duration_ms={} keyword_chars={} message_chars={}",
                started_at.elapsed().as_millis(),
                keyword.chars().count(),
                message.chars().count()
            ),
            Err(err) => log_failure(SnippetOperation::Put, started_at, err),
        }
        result.map_err(|err| {
            SnippetServiceError::from_repo(SnippetOperation::Put, Some(keyword), err)
        })
    }

    /// Gets the snippet stored under exactly `keyword`.
    ///
    /// A missing keyword is reported as `SnippetServiceError::NotFound`.
    pub fn get(&mut self, keyword: &str) -> SnippetServiceResult<Snippet> {
        let started_at = Instant::now();
        let result = self.repo.get(keyword);
        match &result {
            Ok(snippet) => info!(
                "event=snippet_get module=service status=ok duration_ms={} message_chars={}",
                started_at.elapsed().as_millis(),
                snippet.message.chars().count()
            ),
            Err(err) => log_failure(SnippetOperation::Get, started_at, err),
        }
        result.map_err(|err| {
            SnippetServiceError::from_repo(SnippetOperation::Get, Some(keyword), err)
        })
    }

    /// Lists every stored keyword in ascending order.
    pub fn catalog(&mut self) -> SnippetServiceResult<Vec<String>> {
        let started_at = Instant::now();
        let result = self.repo.list_keys();
        match &result {
            Ok(keys) => info!(
                "event=snippet_catalog module=service status=ok duration_ms={} rows={}",
                started_at.elapsed().as_millis(),
                keys.len()
            ),
            Err(err) => log_failure(SnippetOperation::Catalog, started_at, err),
        }
        result.map_err(|err| SnippetServiceError::from_repo(SnippetOperation::Catalog, None, err))
    }

    /// Returns snippets whose message contains `text`, ignoring case.
    pub fn search(&mut self, text: &str) -> SnippetServiceResult<Vec<Snippet>> {
        let started_at = Instant::now();
        let query = SubstringQuery::new(text);
        let result = self.repo.search(&query);
        match &result {
            Ok(hits) => info!(
                "event=snippet_search module=service status=ok duration_ms={} query_chars={} rows={}",
                started_at.elapsed().as_millis(),
                text.chars().count(),
                hits.len()
            ),
            Err(err) => log_failure(SnippetOperation::Search, started_at, err),
        }
        result.map_err(|err| SnippetServiceError::from_repo(SnippetOperation::Search, None, err))
    }
}

fn log_failure(operation: SnippetOperation, started_at: Instant, err: &RepoError) {
    let duration_ms = started_at.elapsed().as_millis();
    match err {
        RepoError::NotFound(_) | RepoError::Validation(_) => debug!(
            "event=snippet_{} module=service status=rejected duration_ms={} error_code={}",
            operation,
            duration_ms,
            repo_error_code(err)
        ),
        _ => error!(
            "event=snippet_{} module=service status=error duration_ms={} error_code={} error={}",
            operation,
            duration_ms,
            repo_error_code(err),
            err
        ),
    }
}

fn repo_error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "invalid_keyword",
        RepoError::NotFound(_) => "not_found",
        RepoError::Db(_) => "db_failed",
        RepoError::InvalidData(_) => "invalid_data",
        RepoError::MissingRequiredTable(_) | RepoError::MissingRequiredColumn { .. } => {
            "schema_mismatch"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SnippetOperation, SnippetService, SnippetServiceError};
    use crate::model::snippet::Snippet;
    use crate::repo::snippet_repo::{RepoError, RepoResult, SnippetRepository};
    use crate::db::DbError;
    use crate::search::substring::SubstringQuery;
    use std::error::Error;

    /// Repository double that fails every call with a canned error.
    struct FailingRepo {
        make_error: fn() -> RepoError,
    }

    impl SnippetRepository for FailingRepo {
        fn put(&mut self, _keyword: &str, _message: &str) -> RepoResult<Snippet> {
            Err((self.make_error)())
        }
        fn get(&mut self, _keyword: &str) -> RepoResult<Snippet> {
            Err((self.make_error)())
        }
        fn list_keys(&mut self) -> RepoResult<Vec<String>> {
            Err((self.make_error)())
        }
        fn search(&mut self, _query: &SubstringQuery) -> RepoResult<Vec<Snippet>> {
            Err((self.make_error)())
        }
    }

    fn locked() -> RepoError {
        RepoError::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        )))
    }

    #[test]
    fn storage_errors_carry_operation_and_keyword() {
        let mut service = SnippetService::new(FailingRepo { make_error: locked });

        let err = service.put("greeting", "hi").unwrap_err();
        match &err {
            SnippetServiceError::Storage {
                operation,
                keyword,
                ..
            } => {
                assert_eq!(*operation, SnippetOperation::Put);
                assert_eq!(keyword.as_deref(), Some("greeting"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("put `greeting` failed"));
        assert!(err.source().is_some());

        let err = service.catalog().unwrap_err();
        assert!(err.to_string().starts_with("catalog failed"));
        assert_eq!(err.code(), "storage_failed");
    }

    #[test]
    fn not_found_is_not_a_storage_error() {
        let mut service = SnippetService::new(FailingRepo {
            make_error: || RepoError::NotFound("missing".to_string()),
        });

        let err = service.get("missing").unwrap_err();
        assert!(matches!(
            err,
            SnippetServiceError::NotFound { ref keyword } if keyword == "missing"
        ));
        assert_eq!(err.to_string(), "keyword `missing` not available");
    }
}
