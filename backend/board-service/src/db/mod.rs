/// Database access layer
///
/// Repository functions over PostgreSQL. Read paths take a `&PgPool`;
/// functions that participate in a multi-statement transaction take a
/// `&mut PgConnection` so the service layer can run them against an open
/// `sqlx` transaction.
pub mod comment_repo;
pub mod peek_repo;
pub mod post_repo;
pub mod vote_repo;
