use crate::models::Post;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Create a new post with score 1 (the author's implicit self-upvote).
/// Returns the created post.
pub async fn create_post(
    conn: &mut PgConnection,
    content: &str,
    owner_session_id: &str,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (content, score, owner_session_id)
        VALUES ($1, 1, $2)
        RETURNING id, content, score, created_at, owner_session_id
        "#,
    )
    .bind(content)
    .bind(owner_session_id)
    .fetch_one(conn)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, score, created_at, owner_session_id
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID and take a row lock on it, serializing concurrent
/// vote/delete mutations of the same post.
pub async fn find_post_for_update(
    conn: &mut PgConnection,
    post_id: Uuid,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, score, created_at, owner_session_id
        FROM posts
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(post_id)
    .fetch_optional(conn)
    .await?;

    Ok(post)
}

/// List all posts in insertion order (oldest first). The feed ranker
/// stable-sorts this sequence, so insertion order is the tie-break.
pub async fn list_posts(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, content, score, created_at, owner_session_id
        FROM posts
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Apply a ledger-derived delta to a post's score. Returns the new score.
pub async fn adjust_score(
    conn: &mut PgConnection,
    post_id: Uuid,
    delta: i64,
) -> Result<i64, sqlx::Error> {
    let (score,): (i64,) = sqlx::query_as(
        r#"
        UPDATE posts
        SET score = score + $1
        WHERE id = $2
        RETURNING score
        "#,
    )
    .bind(delta)
    .bind(post_id)
    .fetch_one(conn)
    .await?;

    Ok(score)
}

/// Delete a post row. Comments and votes are removed explicitly by the
/// service layer in the same transaction before this runs.
pub async fn delete_post(conn: &mut PgConnection, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(())
}
