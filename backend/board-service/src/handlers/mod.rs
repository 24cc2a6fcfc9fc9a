/// HTTP handlers for board-service
pub mod comments;
pub mod feed;
pub mod posts;
pub mod votes;
