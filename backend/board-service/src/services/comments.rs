/// Comment service - appends to a post's discussion thread
use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::metrics::board::COMMENTS_CREATED_TOTAL;
use crate::models::{Comment, COMMENT_CONTENT_MAX_CHARS};
use sqlx::PgPool;
use uuid::Uuid;

/// Reject empty or over-long comment content, counted in characters.
pub fn validate_comment_content(content: &str) -> Result<()> {
    let chars = content.chars().count();
    if chars == 0 {
        return Err(AppError::ValidationError(
            "comment content must not be empty".to_string(),
        ));
    }
    if chars > COMMENT_CONTENT_MAX_CHARS {
        return Err(AppError::ValidationError(format!(
            "comment content must be at most {} characters, got {}",
            COMMENT_CONTENT_MAX_CHARS, chars
        )));
    }
    Ok(())
}

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a comment to a post. Comments are immutable once created and
    /// only disappear when the parent post is deleted.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        content: &str,
        session_id: &str,
    ) -> Result<Comment> {
        validate_comment_content(content)?;

        let mut tx = self.pool.begin().await?;

        let exists = post_repo::find_post_for_update(&mut *tx, post_id).await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("post {} not found", post_id)));
        }

        let comment = comment_repo::create_comment(&mut *tx, post_id, content, session_id).await?;

        tx.commit().await?;

        COMMENTS_CREATED_TOTAL.inc();
        tracing::debug!(%post_id, comment_id = %comment.id, "comment added");

        Ok(comment)
    }

    /// Get comments for a post, newest first. Matches the detail endpoint:
    /// a missing post is `NotFound`, not an empty thread.
    pub async fn get_post_comments(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        if post_repo::find_post_by_id(&self.pool, post_id).await?.is_none() {
            return Err(AppError::NotFound(format!("post {} not found", post_id)));
        }

        let comments = comment_repo::get_comments_by_post(&self.pool, post_id).await?;
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_content_boundaries() {
        assert!(validate_comment_content("").is_err());
        assert!(validate_comment_content("nice").is_ok());
        assert!(validate_comment_content(&"x".repeat(150)).is_ok());
        assert!(validate_comment_content(&"x".repeat(151)).is_err());
    }
}
