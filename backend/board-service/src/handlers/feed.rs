/// Feed handlers - ranked feed endpoint
use crate::error::Result;
use crate::middleware::SessionId;
use crate::services::{FeedService, SortMode};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    #[serde(default = "default_sort")]
    pub sort: SortMode,
}

fn default_sort() -> SortMode {
    SortMode::Hot
}

/// Get the ranked feed for the calling session
/// GET /api/v1/feed?sort=hot|new
pub async fn get_feed(
    pool: web::Data<PgPool>,
    session: SessionId,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone());
    let posts = service.list_feed(query.sort, &session.0).await?;

    Ok(HttpResponse::Ok().json(posts))
}
