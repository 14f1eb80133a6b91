/// Follow handlers - edge creation/removal and the follow feed
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::pagination::PageQuery;
use crate::services::{FollowService, UserService};
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use super::posts::PostSummary;
use super::{profile_url, see_other};

/// Follow an author. A self-follow is silently refused; either way the
/// caller lands back on the profile.
pub async fn follow_author(
    pool: web::Data<PgPool>,
    follow_service: web::Data<FollowService>,
    user_id: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = UserService::new((**pool).clone())
        .get_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("user does not exist".to_string()))?;

    follow_service.follow(user_id.0, author.id).await?;

    Ok(see_other(profile_url(&author.username)))
}

/// Unfollow an author; 404 when there is no edge to remove.
pub async fn unfollow_author(
    pool: web::Data<PgPool>,
    follow_service: web::Data<FollowService>,
    user_id: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = UserService::new((**pool).clone())
        .get_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("user does not exist".to_string()))?;

    follow_service.unfollow(user_id.0, author.id).await?;

    Ok(see_other(profile_url(&author.username)))
}

/// The requesting user's feed: posts by every author they follow.
pub async fn feed(
    config: web::Data<Config>,
    follow_service: web::Data<FollowService>,
    user_id: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = follow_service
        .feed(user_id.0, query.page, config.pagination.page_size)
        .await?;

    Ok(HttpResponse::Ok().json(page.map(PostSummary::from)))
}
