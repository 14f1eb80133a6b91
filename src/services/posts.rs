/// Post service - creation, retrieval, editing, and the shared listing
/// contract (most-recent-first, fixed-size pages) used by the index, group,
/// and profile listings.
use crate::domain::models::Post;
use crate::error::Result;
use crate::pagination::{clamp_page, Page};
use sqlx::PgPool;
use uuid::Uuid;

/// Filter applied to a post listing.
#[derive(Debug, Clone, Copy)]
pub enum PostFilter {
    All,
    ByAuthor(Uuid),
    ByGroup(Uuid),
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post. `pub_date` is set by the database and immutable.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (text, author_id, group_id, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, pub_date, author_id, group_id, image
            "#,
        )
        .bind(text)
        .bind(author_id)
        .bind(group_id)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, text, pub_date, author_id, group_id, image
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Replace a post's editable fields; `pub_date` and `author_id` never
    /// change.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $2, group_id = $3, image = $4
            WHERE id = $1
            RETURNING id, text, pub_date, author_id, group_id, image
            "#,
        )
        .bind(post_id)
        .bind(text)
        .bind(group_id)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    /// Count posts matching a filter
    pub async fn count_posts(&self, filter: PostFilter) -> Result<i64> {
        let count: i64 = match filter {
            PostFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts")
                    .fetch_one(&self.pool)
                    .await?
            }
            PostFilter::ByAuthor(author_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
                    .bind(author_id)
                    .fetch_one(&self.pool)
                    .await?
            }
            PostFilter::ByGroup(group_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = $1")
                    .bind(group_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Fetch one page of posts matching a filter, most recent first.
    /// Out-of-range page numbers clamp rather than fail.
    pub async fn page_of_posts(
        &self,
        filter: PostFilter,
        requested_page: i64,
        page_size: i64,
    ) -> Result<Page<Post>> {
        let total = self.count_posts(filter).await?;
        let (page, offset) = clamp_page(requested_page, total, page_size);

        let posts = match filter {
            PostFilter::All => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT id, text, pub_date, author_id, group_id, image
                    FROM posts
                    ORDER BY pub_date DESC, id DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            PostFilter::ByAuthor(author_id) => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT id, text, pub_date, author_id, group_id, image
                    FROM posts
                    WHERE author_id = $1
                    ORDER BY pub_date DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(author_id)
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            PostFilter::ByGroup(group_id) => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT id, text, pub_date, author_id, group_id, image
                    FROM posts
                    WHERE group_id = $1
                    ORDER BY pub_date DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(group_id)
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(Page::new(posts, page, page_size, total))
    }
}
