/// Feed service - ranking and caller-specific projection
///
/// Ranking is a pure stable sort over posts fetched in insertion order, so
/// equal-key posts keep their relative order across requests. Projection
/// annotates each post with the caller's own vote and an ownership flag;
/// detail views carry the discussion thread newest-first, which is
/// intentionally the opposite of the feed order.
use crate::db::{comment_repo, post_repo, vote_repo};
use crate::error::Result;
use crate::metrics::board::FEED_REQUESTS_TOTAL;
use crate::models::{Comment, CommentView, Post, PostDetailView, PostView};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Feed sort mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Descending aggregate vote score.
    Hot,
    /// Descending creation time.
    New,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::New => "new",
        }
    }
}

/// Produce a fresh ordering of `posts` for the given mode. The sort is
/// stable and the input is left untouched; callers pass posts in insertion
/// order so that order is the tie-break.
pub fn rank(posts: &[Post], mode: SortMode) -> Vec<Post> {
    let mut ranked = posts.to_vec();
    match mode {
        SortMode::Hot => ranked.sort_by(|a, b| b.score.cmp(&a.score)),
        SortMode::New => ranked.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    ranked
}

/// Annotate a post with caller-specific fields and its comment count.
pub fn project(post: &Post, user_vote: i16, comment_count: i64, session_id: &str) -> PostView {
    PostView {
        id: post.id,
        content: post.content.clone(),
        score: post.score,
        created_at: post.created_at,
        user_vote,
        is_owner: post.owner_session_id == session_id,
        comment_count,
    }
}

/// Assemble the detail view: annotated post plus comments, newest first.
pub fn project_detail(
    post: &Post,
    mut comments: Vec<Comment>,
    user_vote: i16,
    session_id: &str,
) -> PostDetailView {
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    PostDetailView {
        id: post.id,
        content: post.content.clone(),
        score: post.score,
        created_at: post.created_at,
        user_vote,
        is_owner: post.owner_session_id == session_id,
        comments: comments.into_iter().map(CommentView::from).collect(),
    }
}

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The ordered feed for a caller: ranked posts annotated with that
    /// caller's votes and ownership flags.
    pub async fn list_feed(&self, mode: SortMode, session_id: &str) -> Result<Vec<PostView>> {
        let posts = post_repo::list_posts(&self.pool).await?;
        let ranked = rank(&posts, mode);

        let post_ids: Vec<Uuid> = ranked.iter().map(|p| p.id).collect();
        let votes: HashMap<Uuid, i16> =
            vote_repo::find_user_votes_batch(&self.pool, session_id, &post_ids)
                .await?
                .into_iter()
                .collect();
        let comment_counts: HashMap<Uuid, i64> =
            comment_repo::count_comments_batch(&self.pool, &post_ids)
                .await?
                .into_iter()
                .collect();

        FEED_REQUESTS_TOTAL
            .with_label_values(&[mode.as_str()])
            .inc();

        let views = ranked
            .iter()
            .map(|post| {
                let user_vote = votes.get(&post.id).copied().unwrap_or(0);
                let comment_count = comment_counts.get(&post.id).copied().unwrap_or(0);
                project(post, user_vote, comment_count, session_id)
            })
            .collect();

        Ok(views)
    }

    /// A single post with its comments, annotated for the caller. `None`
    /// if the post id does not resolve.
    pub async fn get_post_detail(
        &self,
        post_id: Uuid,
        session_id: &str,
    ) -> Result<Option<PostDetailView>> {
        let Some(post) = post_repo::find_post_by_id(&self.pool, post_id).await? else {
            return Ok(None);
        };

        let comments = comment_repo::get_comments_by_post(&self.pool, post_id).await?;
        let user_vote = vote_repo::find_user_vote(&self.pool, post_id, session_id)
            .await?
            .map(|v| v.vote_value)
            .unwrap_or(0);

        Ok(Some(project_detail(&post, comments, user_vote, session_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn post(content: &str, score: i64, age_secs: i64, owner: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            content: content.to_string(),
            score,
            created_at: Utc::now() - Duration::seconds(age_secs),
            owner_session_id: owner.to_string(),
        }
    }

    #[test]
    fn hot_sorts_by_score_descending() {
        let posts = vec![
            post("low", 1, 30, "s1"),
            post("high", 9, 20, "s1"),
            post("mid", 4, 10, "s1"),
        ];
        let ranked = rank(&posts, SortMode::Hot);
        let contents: Vec<&str> = ranked.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["high", "mid", "low"]);
    }

    #[test]
    fn new_sorts_by_creation_descending() {
        let posts = vec![
            post("oldest", 9, 300, "s1"),
            post("newest", 1, 10, "s1"),
            post("middle", 4, 100, "s1"),
        ];
        let ranked = rank(&posts, SortMode::New);
        let contents: Vec<&str> = ranked.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn hot_tie_break_preserves_input_order() {
        // A created before B, equal scores: stable sort keeps [A, B]
        let a = post("A", 5, 60, "s1");
        let b = post("B", 5, 30, "s1");
        let ranked = rank(&[a.clone(), b.clone()], SortMode::Hot);
        assert_eq!(ranked[0].id, a.id);
        assert_eq!(ranked[1].id, b.id);
    }

    #[test]
    fn rank_does_not_mutate_input() {
        let posts = vec![post("low", 1, 30, "s1"), post("high", 9, 20, "s1")];
        let before: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let _ = rank(&posts, SortMode::Hot);
        let after: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn projection_annotates_vote_and_ownership() {
        let p = post("mine", 3, 10, "owner-session");
        let view = project(&p, 1, 4, "owner-session");
        assert_eq!(view.user_vote, 1);
        assert_eq!(view.comment_count, 4);
        assert!(view.is_owner);

        let other = project(&p, 0, 0, "someone-else");
        assert_eq!(other.user_vote, 0);
        assert_eq!(other.comment_count, 0);
        assert!(!other.is_owner);
    }

    #[test]
    fn detail_comments_are_newest_first() {
        let p = post("threaded", 1, 600, "s1");
        let mk = |content: &str, age: i64| Comment {
            id: Uuid::new_v4(),
            post_id: p.id,
            content: content.to_string(),
            created_at: Utc::now() - Duration::seconds(age),
            owner_session_id: "s2".to_string(),
        };
        // passed oldest-first on purpose
        let comments = vec![mk("first", 500), mk("second", 300), mk("third", 100)];

        let detail = project_detail(&p, comments, 0, "s2");
        let order: Vec<&str> = detail.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(order, vec!["third", "second", "first"]);
    }
}
