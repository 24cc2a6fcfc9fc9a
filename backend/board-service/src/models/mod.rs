/// Data models for board-service
///
/// This module defines structures for:
/// - Post: Short anonymous text posts with a denormalized vote score
/// - Comment: Immutable comments on posts
/// - Vote: At-most-one-per-(post, session) ledger rows backing the score
/// - Views: Caller-annotated projections returned by the API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum post content length, in characters.
pub const POST_CONTENT_MAX_CHARS: usize = 200;

/// Maximum comment content length, in characters.
pub const COMMENT_CONTENT_MAX_CHARS: usize = 150;

/// Starting peek score for a session that has never posted or voted.
pub const PEEK_SCORE_BASELINE: i64 = 137;

/// Peek score reward for creating a post; the same amount is taken back
/// when the owner deletes it.
pub const POST_PEEK_REWARD: i64 = 10;

/// A board post.
///
/// `score` is denormalized and must always equal the sum of `vote_value`
/// over the votes rows referencing this post. It is only ever adjusted with
/// ledger-derived deltas inside the same transaction as the ledger mutation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub owner_session_id: String,
}

/// A comment on a post. Immutable once created; removed only when the
/// parent post is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner_session_id: String,
}

/// A vote ledger row. `vote_value` is -1 or +1; the absence of a row means
/// "no vote" (0).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub post_id: Uuid,
    pub session_id: String,
    pub vote_value: i16,
    pub created_at: DateTime<Utc>,
}

/// A post as seen by a specific caller: base fields plus that caller's
/// current vote and an ownership flag. Owner session ids are never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub content: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub user_vote: i16,
    pub is_owner: bool,
    pub comment_count: i64,
}

/// A comment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A single post with its discussion thread, newest comment first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailView {
    pub id: Uuid,
    pub content: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
    pub user_vote: i16,
    pub is_owner: bool,
    pub comments: Vec<CommentView>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        CommentView {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}
