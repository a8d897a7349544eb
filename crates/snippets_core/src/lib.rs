//! Core storage logic for the snippets store.
//! This crate owns every snippet invariant; the CLI only dispatches and renders.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use logging::{
    default_log_level, flush_logging, init_logging, logging_status, LoggingError,
};
pub use model::snippet::{validate_keyword, Snippet, SnippetValidationError};
pub use repo::snippet_repo::{RepoError, RepoResult, SnippetRepository, SqliteSnippetRepository};
pub use search::substring::{contains_ignore_case, SubstringQuery};
pub use service::snippet_service::{
    SnippetOperation, SnippetService, SnippetServiceError, SnippetServiceResult,
};
