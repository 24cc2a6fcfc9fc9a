/// Board Service Library
///
/// Handles the anonymous local-feed posting board: short text posts,
/// per-session up/down votes, comments, and "hot"/"new" feed browsing.
/// Identity is a bare opaque session token; there are no accounts.
///
/// # Modules
///
/// - `handlers`: Board HTTP request handlers
/// - `models`: Data structures for posts, comments, votes, peek scores
/// - `services`: Business logic layer (vote ledger, feed ranking, projection)
/// - `db`: Database access layer and repositories
/// - `middleware`: HTTP middleware for session extraction and request metrics
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
