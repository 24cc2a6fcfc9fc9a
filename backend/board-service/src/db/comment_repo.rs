use crate::models::Comment;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

/// Create a new comment on a post
pub async fn create_comment(
    conn: &mut PgConnection,
    post_id: Uuid,
    content: &str,
    owner_session_id: &str,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, content, owner_session_id)
        VALUES ($1, $2, $3)
        RETURNING id, post_id, content, created_at, owner_session_id
        "#,
    )
    .bind(post_id)
    .bind(content)
    .bind(owner_session_id)
    .fetch_one(conn)
    .await?;

    Ok(comment)
}

/// Get all comments for a post, newest first (discussion threads read
/// newest-first, unlike the post feed).
pub async fn get_comments_by_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, content, created_at, owner_session_id
        FROM comments
        WHERE post_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Count comments for multiple posts in one query. Posts without comments
/// are absent from the result.
pub async fn count_comments_batch(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT post_id, COUNT(*)::BIGINT AS comment_count
        FROM comments
        WHERE post_id = ANY($1)
        GROUP BY post_id
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let counts = rows
        .into_iter()
        .map(|row| {
            let post_id: Uuid = row.get("post_id");
            let count: i64 = row.get("comment_count");
            (post_id, count)
        })
        .collect();

    Ok(counts)
}

/// Cascade-delete all comments for a post. Returns the number removed.
pub async fn delete_comments_by_post(
    conn: &mut PgConnection,
    post_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM comments
        WHERE post_id = $1
        "#,
    )
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}
