use crate::models::PEEK_SCORE_BASELINE;
use sqlx::{PgConnection, PgPool};

/// Apply a delta to a session's peek score, initializing the row at the
/// baseline on first touch. Runs inside the same transaction as the
/// post/vote mutation that triggered the change. Returns the new score.
pub async fn adjust_peek_score(
    conn: &mut PgConnection,
    session_id: &str,
    delta: i64,
) -> Result<i64, sqlx::Error> {
    let (score,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO peek_scores (session_id, score)
        VALUES ($1, $2 + $3)
        ON CONFLICT (session_id)
        DO UPDATE SET score = peek_scores.score + $3, updated_at = NOW()
        RETURNING score
        "#,
    )
    .bind(session_id)
    .bind(PEEK_SCORE_BASELINE)
    .bind(delta)
    .fetch_one(conn)
    .await?;

    Ok(score)
}

/// Get a session's peek score, or the baseline if the session has never
/// posted or voted.
pub async fn get_peek_score(pool: &PgPool, session_id: &str) -> Result<i64, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT score FROM peek_scores WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|(score,)| score).unwrap_or(PEEK_SCORE_BASELINE))
}
