/// Post service - creation, deletion, and reporting of board posts
use crate::db::{comment_repo, peek_repo, post_repo, vote_repo};
use crate::error::{AppError, Result};
use crate::metrics::board::{POSTS_CREATED_TOTAL, POSTS_DELETED_TOTAL, POSTS_REPORTED_TOTAL};
use crate::models::{Post, POST_CONTENT_MAX_CHARS, POST_PEEK_REWARD};
use sqlx::PgPool;
use uuid::Uuid;

/// Reject empty or over-long post content. Lengths are counted in
/// characters, not bytes.
pub fn validate_post_content(content: &str) -> Result<()> {
    let chars = content.chars().count();
    if chars == 0 {
        return Err(AppError::ValidationError(
            "post content must not be empty".to_string(),
        ));
    }
    if chars > POST_CONTENT_MAX_CHARS {
        return Err(AppError::ValidationError(format!(
            "post content must be at most {} characters, got {}",
            POST_CONTENT_MAX_CHARS, chars
        )));
    }
    Ok(())
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = post_repo::find_post_by_id(&self.pool, post_id).await?;
        Ok(post)
    }

    /// Create a new post.
    ///
    /// The post starts at score 1 with a matching (owner, +1) vote row, so
    /// the author's later toggle behaves like any other vote. The owner's
    /// peek score gains the posting reward in the same transaction.
    /// Returns the post and the owner's new peek score.
    pub async fn create_post(&self, content: &str, session_id: &str) -> Result<(Post, i64)> {
        validate_post_content(content)?;

        let mut tx = self.pool.begin().await?;

        let post = post_repo::create_post(&mut *tx, content, session_id).await?;
        vote_repo::insert_vote(&mut *tx, post.id, session_id, 1).await?;
        let peek_score =
            peek_repo::adjust_peek_score(&mut *tx, session_id, POST_PEEK_REWARD).await?;

        tx.commit().await?;

        POSTS_CREATED_TOTAL.inc();
        tracing::info!(post_id = %post.id, "post created");

        Ok((post, peek_score))
    }

    /// Delete a post owned by the caller, cascading to its comments and
    /// votes, all-or-nothing. The peek penalty is unconditional and does
    /// not depend on the post's current score.
    /// Returns the owner's new peek score.
    pub async fn delete_post(&self, post_id: Uuid, session_id: &str) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let Some(post) = post_repo::find_post_for_update(&mut *tx, post_id).await? else {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("post {} not found", post_id)));
        };

        if post.owner_session_id != session_id {
            // Leave the post exactly as it was.
            tx.rollback().await?;
            return Err(AppError::Forbidden(
                "only the post owner can delete it".to_string(),
            ));
        }

        let comments_removed = comment_repo::delete_comments_by_post(&mut *tx, post_id).await?;
        let votes_removed = vote_repo::delete_votes_by_post(&mut *tx, post_id).await?;
        post_repo::delete_post(&mut *tx, post_id).await?;
        let peek_score =
            peek_repo::adjust_peek_score(&mut *tx, session_id, -POST_PEEK_REWARD).await?;

        tx.commit().await?;

        POSTS_DELETED_TOTAL.inc();
        tracing::info!(%post_id, comments_removed, votes_removed, "post deleted");

        Ok(peek_score)
    }

    /// Acknowledge a report. Deliberately a no-op on state: the reference
    /// behavior is a pure acknowledgment signal, not an omission.
    pub async fn report_post(&self, post_id: Uuid) -> Result<()> {
        POSTS_REPORTED_TOTAL.inc();
        tracing::info!(%post_id, "post reported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_content_boundaries() {
        assert!(validate_post_content("").is_err());
        assert!(validate_post_content("Hello").is_ok());
        assert!(validate_post_content(&"x".repeat(200)).is_ok());
        assert!(validate_post_content(&"x".repeat(201)).is_err());
    }

    #[test]
    fn post_content_counts_characters_not_bytes() {
        // 200 multi-byte characters is still within bounds
        assert!(validate_post_content(&"é".repeat(200)).is_ok());
        assert!(validate_post_content(&"é".repeat(201)).is_err());
    }
}
