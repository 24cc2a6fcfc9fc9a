/// Business logic layer for board-service
///
/// This module provides high-level operations:
/// - Post service: Post creation, deletion, reporting
/// - Comment service: Discussion threads on posts
/// - Vote service: The vote ledger and score reconciliation core
/// - Feed service: Feed ranking and caller-specific projection
pub mod comments;
pub mod feed;
pub mod posts;
pub mod votes;

// Re-export commonly used services
pub use comments::CommentService;
pub use feed::{FeedService, SortMode};
pub use posts::PostService;
pub use votes::{VoteDirection, VoteService};
