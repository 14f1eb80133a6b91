/// Profile handlers - an author's page: their posts plus follow counts and,
/// for an authenticated viewer, whether they follow this author
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::pagination::{Page, PageQuery};
use crate::services::{FollowService, PostFilter, PostService, UserService};
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use super::posts::PostSummary;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
    /// Whether the requesting user follows this author; false for anonymous
    /// viewers.
    pub is_following: bool,
    pub posts: Page<PostSummary>,
}

pub async fn get_profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    follow_service: web::Data<FollowService>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: Option<UserId>,
) -> Result<HttpResponse> {
    let author = UserService::new((**pool).clone())
        .get_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("user does not exist".to_string()))?;

    let post_service = PostService::new((**pool).clone());
    let posts = post_service
        .page_of_posts(
            PostFilter::ByAuthor(author.id),
            query.page,
            config.pagination.page_size,
        )
        .await?;

    let follower_count = follow_service.follower_count(author.id).await?;
    let following_count = follow_service.following_count(author.id).await?;
    let is_following = match viewer {
        Some(UserId(viewer_id)) => follow_service.is_following(viewer_id, author.id).await?,
        None => false,
    };

    Ok(HttpResponse::Ok().json(ProfileResponse {
        username: author.username,
        post_count: posts.total_items,
        follower_count,
        following_count,
        is_following,
        posts: posts.map(PostSummary::from),
    }))
}
