/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::SessionId;
use crate::services::{FeedService, PostService, VoteService};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub id: Uuid,
    pub content: String,
    pub score: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub user_vote: i16,
    pub is_owner: bool,
    pub comment_count: i64,
    pub peek_score: i64,
    pub peek_delta: i64,
}

/// Create a new post
/// POST /api/v1/posts
pub async fn create_post(
    pool: web::Data<PgPool>,
    session: SessionId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let (post, peek_score) = service.create_post(&req.content, &session.0).await?;

    Ok(HttpResponse::Created().json(CreatePostResponse {
        id: post.id,
        content: post.content,
        score: post.score,
        created_at: post.created_at,
        user_vote: 1,
        is_owner: true,
        comment_count: 0,
        peek_score,
        peek_delta: crate::models::POST_PEEK_REWARD,
    }))
}

/// Get a post with its comments, annotated for the caller
/// GET /api/v1/posts/{id}
pub async fn get_post_detail(
    pool: web::Data<PgPool>,
    session: SessionId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    match service.get_post_detail(*post_id, &session.0).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

/// Delete a post owned by the caller
/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    pool: web::Data<PgPool>,
    session: SessionId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let peek_score = service.delete_post(*post_id, &session.0).await?;
    tracing::debug!(peek_score, "post deleted by owner");

    Ok(HttpResponse::NoContent().finish())
}

/// Acknowledge a report of a post
/// POST /api/v1/posts/{id}/report
pub async fn report_post(
    pool: web::Data<PgPool>,
    _session: SessionId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    service.report_post(*post_id).await?;

    Ok(HttpResponse::Accepted().json(json!({ "status": "acknowledged" })))
}

/// Get the caller's peek score
/// GET /api/v1/session/score
pub async fn get_session_score(
    pool: web::Data<PgPool>,
    session: SessionId,
) -> Result<HttpResponse> {
    let service = VoteService::new((**pool).clone());
    let score = service.peek_score(&session.0).await?;

    Ok(HttpResponse::Ok().json(json!({ "peek_score": score })))
}
