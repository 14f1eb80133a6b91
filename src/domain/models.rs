use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters shown for a post's text in summary contexts.
pub const POST_PREVIEW_CHARS: usize = 15;

/// User entity - identity projection, authenticated elsewhere
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Group entity - a topic posts can be assigned to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Post entity - a piece of authored content, optionally grouped
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl Post {
    /// Truncated text used wherever posts are listed rather than read.
    pub fn preview(&self) -> String {
        self.text.chars().take(POST_PREVIEW_CHARS).collect()
    }
}

/// Comment entity - cannot exist without both its post and author
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_text(text: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            text: text.to_string(),
            pub_date: Utc::now(),
            author_id: Uuid::new_v4(),
            group_id: None,
            image: None,
        }
    }

    #[test]
    fn preview_truncates_to_fifteen_chars() {
        let post = post_with_text("a very long post body that keeps going");
        assert_eq!(post.preview(), "a very long pos");
    }

    #[test]
    fn preview_keeps_short_text_whole() {
        let post = post_with_text("short");
        assert_eq!(post.preview(), "short");
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        let post = post_with_text("Тестовый текст поста");
        assert_eq!(post.preview(), "Тестовый текст ");
    }
}
