/// Post handlers - HTTP endpoints for the index listing, post detail,
/// creation, and author-only editing
use crate::config::Config;
use crate::domain::models::{Comment, Post};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::pagination::PageQuery;
use crate::services::{CommentService, GroupService, PostFilter, PostService, UserService};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{post_url, see_other};

/// Payload for creating or editing a post.
#[derive(Debug, Deserialize, Validate)]
pub struct PostInput {
    #[validate(length(min = 1, message = "Post text is required"))]
    pub text: String,
    /// Optional group slug
    pub group: Option<String>,
    /// Optional attached media key
    pub image: Option<String>,
}

/// Listing representation of a post: text truncated for summary display.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub preview: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            preview: post.preview(),
            id: post.id,
            pub_date: post.pub_date,
            author_id: post.author_id,
            group_id: post.group_id,
            image: post.image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: Post,
    pub author: String,
    pub author_post_count: i64,
    pub comments: Vec<Comment>,
}

/// Resolve an optional group slug from a payload to its id, reporting an
/// unknown slug as a field-level validation error like any other bad input.
pub(crate) async fn resolve_group(pool: &PgPool, slug: Option<&str>) -> Result<Option<Uuid>> {
    let Some(slug) = slug else {
        return Ok(None);
    };

    match GroupService::new(pool.clone()).get_by_slug(slug).await? {
        Some(group) => Ok(Some(group.id)),
        None => {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("unknown_group");
            error.message = Some("Group does not exist".into());
            errors.add("group", error);
            Err(AppError::Validation(errors))
        }
    }
}

/// List all posts, most recent first
pub async fn list_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let page = service
        .page_of_posts(PostFilter::All, query.page, config.pagination.page_size)
        .await?;

    Ok(HttpResponse::Ok().json(page.map(PostSummary::from)))
}

/// Create a new post
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    payload: web::Json<PostInput>,
) -> Result<HttpResponse> {
    payload.validate()?;
    let group_id = resolve_group(&pool, payload.group.as_deref()).await?;

    let service = PostService::new((**pool).clone());
    let post = service
        .create_post(
            user_id.0,
            &payload.text,
            group_id,
            payload.image.as_deref(),
        )
        .await?;

    Ok(see_other(post_url(post.id)))
}

/// View a single post with its comments
pub async fn get_post(pool: web::Data<PgPool>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service
        .get_post(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post does not exist".to_string()))?;

    let author = UserService::new((**pool).clone())
        .get_by_id(post.author_id)
        .await?
        .ok_or_else(|| AppError::Internal("post author missing".to_string()))?;

    let author_post_count = service.count_posts(PostFilter::ByAuthor(post.author_id)).await?;
    let comments = CommentService::new((**pool).clone())
        .get_post_comments(post.id)
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post,
        author: author.username,
        author_post_count,
        comments,
    }))
}

/// Edit a post. Only the author may change it; anyone else is sent back to
/// the read view with the post untouched.
pub async fn edit_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    payload: web::Json<PostInput>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service
        .get_post(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post does not exist".to_string()))?;

    if post.author_id != user_id.0 {
        return Ok(see_other(post_url(post.id)));
    }

    payload.validate()?;
    let group_id = resolve_group(&pool, payload.group.as_deref()).await?;

    service
        .update_post(post.id, &payload.text, group_id, payload.image.as_deref())
        .await?;

    Ok(see_other(post_url(post.id)))
}
