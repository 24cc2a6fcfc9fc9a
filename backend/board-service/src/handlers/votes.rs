/// Vote handlers - HTTP endpoint for the vote ledger
use crate::error::Result;
use crate::middleware::SessionId;
use crate::services::{VoteDirection, VoteService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// 1 for an upvote, -1 for a downvote. Re-sending the current
    /// direction toggles the vote off.
    pub direction: i16,
}

/// Apply a vote to a post for the calling session
/// POST /api/v1/posts/{id}/votes
pub async fn apply_vote(
    pool: web::Data<PgPool>,
    session: SessionId,
    post_id: web::Path<Uuid>,
    req: web::Json<VoteRequest>,
) -> Result<HttpResponse> {
    let direction = VoteDirection::try_from(req.direction)?;
    let service = VoteService::new((**pool).clone());

    match service.apply_vote(*post_id, &session.0, direction).await? {
        Some(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        // Voting on a vanished post is a defined no-op.
        None => Ok(HttpResponse::Ok().json(json!({ "applied": false }))),
    }
}
