/// Comment handlers - HTTP endpoints for discussion threads
use crate::error::Result;
use crate::middleware::SessionId;
use crate::services::CommentService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Add a comment to a post
/// POST /api/v1/posts/{id}/comments
pub async fn create_comment(
    pool: web::Data<PgPool>,
    session: SessionId,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    let comment = service
        .add_comment(*post_id, &req.content, &session.0)
        .await?;

    Ok(HttpResponse::Created().json(crate::models::CommentView::from(comment)))
}

/// List a post's comments, newest first
/// GET /api/v1/posts/{id}/comments
pub async fn get_comments(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new((**pool).clone());
    let comments = service.get_post_comments(*post_id).await?;
    let views: Vec<crate::models::CommentView> = comments
        .into_iter()
        .map(crate::models::CommentView::from)
        .collect();

    Ok(HttpResponse::Ok().json(views))
}
