/// Follow relation and feed assembly.
///
/// The follow graph is a directed edge set `(user, author)`: an edge grants
/// the user's feed visibility into the author's posts. Edges carry no
/// transitive semantics and mutual follows are allowed. The feed is a single
/// join: posts authored by anyone one outbound edge away, most recent first,
/// sliced with the same pagination contract as every other listing.
///
/// Storage sits behind the `FollowGraph` trait so the semantics are testable
/// without a database; the Postgres implementation leans on the schema's
/// uniqueness and self-follow constraints rather than handler discipline.
use crate::domain::models::Post;
use crate::error::{AppError, Result};
use crate::pagination::{clamp_page, Page};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Storage interface for the follow edge set and the feed join.
#[async_trait]
pub trait FollowGraph: Send + Sync {
    /// Insert an edge; returns false when the edge already existed.
    async fn insert_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;

    /// Remove an edge; returns false when no edge existed.
    async fn remove_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;

    /// Existence check on the edge set.
    async fn edge_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;

    /// How many users follow `author_id`.
    async fn count_followers(&self, author_id: Uuid) -> Result<i64>;

    /// How many authors `user_id` follows.
    async fn count_following(&self, user_id: Uuid) -> Result<i64>;

    /// Total posts visible in `user_id`'s feed.
    async fn count_feed_posts(&self, user_id: Uuid) -> Result<i64>;

    /// One slice of the feed: posts by followed authors, `pub_date DESC`.
    async fn feed_posts(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>>;
}

/// Postgres-backed follow graph.
#[derive(Clone)]
pub struct PgFollowGraph {
    pool: PgPool,
}

impl PgFollowGraph {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowGraph for PgFollowGraph {
    async fn insert_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (user_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, author_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    async fn remove_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE user_id = $1 AND author_id = $2
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn edge_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_followers(&self, author_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_feed_posts(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts p
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn feed_posts(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image
            FROM posts p
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.user_id = $1
            ORDER BY p.pub_date DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}

/// Follow operations and feed construction over an injected graph store.
#[derive(Clone)]
pub struct FollowService {
    graph: Arc<dyn FollowGraph>,
}

impl FollowService {
    pub fn new(graph: Arc<dyn FollowGraph>) -> Self {
        Self { graph }
    }

    /// Create a follow edge. Self-follows are silently rejected and repeat
    /// follows leave the edge set unchanged; neither is an error.
    pub async fn follow(&self, user_id: Uuid, author_id: Uuid) -> Result<()> {
        if user_id == author_id {
            return Ok(());
        }
        self.graph.insert_edge(user_id, author_id).await?;
        Ok(())
    }

    /// Remove a follow edge. Unlike `follow`, removing an edge that does not
    /// exist is an error surfaced to the caller.
    pub async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<()> {
        let removed = self.graph.remove_edge(user_id, author_id).await?;
        if !removed {
            return Err(AppError::NotFound("follow edge does not exist".to_string()));
        }
        Ok(())
    }

    pub async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        self.graph.edge_exists(user_id, author_id).await
    }

    pub async fn follower_count(&self, author_id: Uuid) -> Result<i64> {
        self.graph.count_followers(author_id).await
    }

    pub async fn following_count(&self, user_id: Uuid) -> Result<i64> {
        self.graph.count_following(user_id).await
    }

    /// The user's feed: posts by every followed author, most recent first.
    /// Edge changes are visible on the next call; there is no cache to
    /// invalidate. Following no one yields an empty first page.
    pub async fn feed(
        &self,
        user_id: Uuid,
        requested_page: i64,
        page_size: i64,
    ) -> Result<Page<Post>> {
        let total = self.graph.count_feed_posts(user_id).await?;
        let (page, offset) = clamp_page(requested_page, total, page_size);
        let posts = self.graph.feed_posts(user_id, page_size, offset).await?;

        Ok(Page::new(posts, page, page_size, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory follow graph mirroring the storage semantics: a unique edge
    /// set and a join against an ordered post log.
    #[derive(Default)]
    struct InMemoryFollowGraph {
        edges: Mutex<HashSet<(Uuid, Uuid)>>,
        posts: Mutex<Vec<Post>>,
    }

    impl InMemoryFollowGraph {
        fn add_post(&self, author_id: Uuid, text: &str, age_minutes: i64) -> Post {
            let post = Post {
                id: Uuid::new_v4(),
                text: text.to_string(),
                pub_date: Utc::now() - Duration::minutes(age_minutes),
                author_id,
                group_id: None,
                image: None,
            };
            self.posts.lock().unwrap().push(post.clone());
            post
        }

        fn visible_posts(&self, user_id: Uuid) -> Vec<Post> {
            let edges = self.edges.lock().unwrap();
            let mut posts: Vec<Post> = self
                .posts
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|p| edges.contains(&(user_id, p.author_id)))
                .cloned()
                .collect();
            posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
            posts
        }
    }

    #[async_trait]
    impl FollowGraph for InMemoryFollowGraph {
        async fn insert_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
            Ok(self.edges.lock().unwrap().insert((user_id, author_id)))
        }

        async fn remove_edge(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
            Ok(self.edges.lock().unwrap().remove(&(user_id, author_id)))
        }

        async fn edge_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
            Ok(self.edges.lock().unwrap().contains(&(user_id, author_id)))
        }

        async fn count_followers(&self, author_id: Uuid) -> Result<i64> {
            Ok(self
                .edges
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, a)| *a == author_id)
                .count() as i64)
        }

        async fn count_following(&self, user_id: Uuid) -> Result<i64> {
            Ok(self
                .edges
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _)| *u == user_id)
                .count() as i64)
        }

        async fn count_feed_posts(&self, user_id: Uuid) -> Result<i64> {
            Ok(self.visible_posts(user_id).len() as i64)
        }

        async fn feed_posts(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
            Ok(self
                .visible_posts(user_id)
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }
    }

    fn service() -> (FollowService, Arc<InMemoryFollowGraph>) {
        let graph = Arc::new(InMemoryFollowGraph::default());
        (FollowService::new(graph.clone()), graph)
    }

    #[tokio::test]
    async fn follow_creates_edge_and_bumps_counts() {
        let (svc, _) = service();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        svc.follow(a, b).await.unwrap();

        assert!(svc.is_following(a, b).await.unwrap());
        assert!(!svc.is_following(b, a).await.unwrap());
        assert_eq!(svc.follower_count(b).await.unwrap(), 1);
        assert_eq!(svc.following_count(a).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn follow_is_idempotent() {
        let (svc, _) = service();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        svc.follow(a, b).await.unwrap();
        svc.follow(a, b).await.unwrap();

        assert_eq!(svc.follower_count(b).await.unwrap(), 1);
        assert_eq!(svc.following_count(a).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn self_follow_is_a_silent_no_op() {
        let (svc, _) = service();
        let a = Uuid::new_v4();

        svc.follow(a, a).await.unwrap();

        assert!(!svc.is_following(a, a).await.unwrap());
        assert_eq!(svc.follower_count(a).await.unwrap(), 0);
        assert_eq!(svc.following_count(a).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unfollow_without_edge_is_not_found() {
        let (svc, _) = service();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let err = svc.unfollow(a, b).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(svc.follower_count(b).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn feed_contains_exactly_followed_authors_posts_newest_first() {
        let (svc, graph) = service();
        let reader = Uuid::new_v4();
        let followed = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let old = graph.add_post(followed, "older", 30);
        let new = graph.add_post(followed, "newer", 5);
        graph.add_post(stranger, "unseen", 1);

        svc.follow(reader, followed).await.unwrap();
        let page = svc.feed(reader, 1, 10).await.unwrap();

        let ids: Vec<Uuid> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);
        assert_eq!(page.total_items, 2);
    }

    #[tokio::test]
    async fn new_post_appears_at_feed_head_and_unfollow_removes_it() {
        let (svc, graph) = service();
        let reader = Uuid::new_v4();
        let author = Uuid::new_v4();

        svc.follow(reader, author).await.unwrap();
        graph.add_post(author, "first", 10);
        let latest = graph.add_post(author, "latest", 0);

        let page = svc.feed(reader, 1, 10).await.unwrap();
        assert_eq!(page.items.first().map(|p| p.id), Some(latest.id));

        svc.unfollow(reader, author).await.unwrap();
        let page = svc.feed(reader, 1, 10).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
    }

    #[tokio::test]
    async fn feed_pagination_clamps_and_splits_thirteen_items() {
        let (svc, graph) = service();
        let reader = Uuid::new_v4();
        let author = Uuid::new_v4();
        svc.follow(reader, author).await.unwrap();

        for i in 0..13 {
            graph.add_post(author, &format!("post {i}"), 13 - i);
        }

        let first = svc.feed(reader, 1, 10).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next);

        let second = svc.feed(reader, 2, 10).await.unwrap();
        assert_eq!(second.items.len(), 3);
        assert!(!second.has_next);

        // Past the end clamps to the last page instead of failing.
        let clamped = svc.feed(reader, 9, 10).await.unwrap();
        assert_eq!(clamped.page, 2);
        assert_eq!(clamped.items.len(), 3);
    }

    #[tokio::test]
    async fn empty_feed_is_an_empty_first_page() {
        let (svc, _) = service();
        let reader = Uuid::new_v4();

        let page = svc.feed(reader, 4, 10).await.unwrap();
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 1);
    }
}
