/// Group handlers - group detail with its paginated post listing
use crate::config::Config;
use crate::domain::models::Group;
use crate::error::{AppError, Result};
use crate::pagination::{Page, PageQuery};
use crate::services::{GroupService, PostFilter, PostService};
use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use super::posts::PostSummary;

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub group: Group,
    pub posts: Page<PostSummary>,
}

/// List a group's posts, most recent first
pub async fn get_group(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let group = GroupService::new((**pool).clone())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("group does not exist".to_string()))?;

    let posts = PostService::new((**pool).clone())
        .page_of_posts(
            PostFilter::ByGroup(group.id),
            query.page,
            config.pagination.page_size,
        )
        .await?;

    Ok(HttpResponse::Ok().json(GroupResponse {
        group,
        posts: posts.map(PostSummary::from),
    }))
}
