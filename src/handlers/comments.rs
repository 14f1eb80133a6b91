/// Comment handlers - listing and adding comments under a post
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::pagination::PageQuery;
use crate::services::{CommentService, PostService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::{post_url, see_other};

#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    #[validate(length(min = 1, message = "Comment text is required"))]
    pub text: String,
}

/// One page of a post's comments, newest first
pub async fn list_comments(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    post_id: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let post = PostService::new((**pool).clone())
        .get_post(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post does not exist".to_string()))?;

    let page = CommentService::new((**pool).clone())
        .page_of_comments(post.id, query.page, config.pagination.page_size)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Add a comment to a post
pub async fn create_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    payload: web::Json<CommentInput>,
) -> Result<HttpResponse> {
    let post = PostService::new((**pool).clone())
        .get_post(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post does not exist".to_string()))?;

    payload.validate()?;

    CommentService::new((**pool).clone())
        .create_comment(post.id, user_id.0, &payload.text)
        .await?;

    Ok(see_other(post_url(post.id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_comment_fails_validation() {
        let input = CommentInput {
            text: String::new(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("text"));
    }
}
