use crate::models::Vote;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

/// Find the caller's vote row for a post, if any, inside a transaction.
pub async fn find_vote(
    conn: &mut PgConnection,
    post_id: Uuid,
    session_id: &str,
) -> Result<Option<Vote>, sqlx::Error> {
    let vote = sqlx::query_as::<_, Vote>(
        r#"
        SELECT id, post_id, session_id, vote_value, created_at
        FROM votes
        WHERE post_id = $1 AND session_id = $2
        "#,
    )
    .bind(post_id)
    .bind(session_id)
    .fetch_optional(conn)
    .await?;

    Ok(vote)
}

/// Find the caller's vote row for a post, if any.
pub async fn find_user_vote(
    pool: &PgPool,
    post_id: Uuid,
    session_id: &str,
) -> Result<Option<Vote>, sqlx::Error> {
    let vote = sqlx::query_as::<_, Vote>(
        r#"
        SELECT id, post_id, session_id, vote_value, created_at
        FROM votes
        WHERE post_id = $1 AND session_id = $2
        "#,
    )
    .bind(post_id)
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(vote)
}

/// Insert a vote row. The UNIQUE (post_id, session_id) constraint enforces
/// at most one per caller per post.
pub async fn insert_vote(
    conn: &mut PgConnection,
    post_id: Uuid,
    session_id: &str,
    vote_value: i16,
) -> Result<Vote, sqlx::Error> {
    let vote = sqlx::query_as::<_, Vote>(
        r#"
        INSERT INTO votes (post_id, session_id, vote_value)
        VALUES ($1, $2, $3)
        RETURNING id, post_id, session_id, vote_value, created_at
        "#,
    )
    .bind(post_id)
    .bind(session_id)
    .bind(vote_value)
    .fetch_one(conn)
    .await?;

    Ok(vote)
}

/// Flip an existing vote row in place.
pub async fn update_vote_value(
    conn: &mut PgConnection,
    vote_id: Uuid,
    vote_value: i16,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE votes
        SET vote_value = $1
        WHERE id = $2
        "#,
    )
    .bind(vote_value)
    .bind(vote_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Remove a vote row (toggle-off).
pub async fn delete_vote(conn: &mut PgConnection, vote_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM votes
        WHERE id = $1
        "#,
    )
    .bind(vote_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Cascade-delete all votes for a post. Returns the number removed.
pub async fn delete_votes_by_post(
    conn: &mut PgConnection,
    post_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM votes
        WHERE post_id = $1
        "#,
    )
    .bind(post_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Sum of all vote values for a post. The post's stored score must equal
/// this at all times; used by tests to check the invariant.
pub async fn sum_votes_by_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let (sum,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(vote_value), 0)::BIGINT FROM votes WHERE post_id = $1",
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(sum)
}

/// Get the caller's vote value for multiple posts in one query.
pub async fn find_user_votes_batch(
    pool: &PgPool,
    session_id: &str,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, i16)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT post_id, vote_value
        FROM votes
        WHERE session_id = $1 AND post_id = ANY($2)
        "#,
    )
    .bind(session_id)
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let votes = rows
        .into_iter()
        .map(|row| {
            let post_id: Uuid = row.get("post_id");
            let vote_value: i16 = row.get("vote_value");
            (post_id, vote_value)
        })
        .collect();

    Ok(votes)
}
