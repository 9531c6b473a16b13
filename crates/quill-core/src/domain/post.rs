use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_shared::dto::PostInput;

use super::slug::slugify;

/// Post entity - a blog post with its authorship and publication state.
///
/// `author_id` is set once at creation and never changed by updates.
/// `view_count` only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub slug: String,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post from validated input, owned by `author_id`.
    pub fn new(author_id: Uuid, category_id: Uuid, input: PostInput) -> Self {
        let now = Utc::now();
        let slug = slugify(&input.title);
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            excerpt: input.excerpt,
            slug,
            author_id,
            category_id,
            tags: input.tags,
            is_published: input.is_published,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields with validated input.
    ///
    /// Authorship and view count are untouched; the slug follows the title.
    pub fn apply(&mut self, category_id: Uuid, input: PostInput) {
        self.slug = slugify(&input.title);
        self.title = input.title;
        self.content = input.content;
        self.excerpt = input.excerpt;
        self.category_id = category_id;
        self.tags = input.tags;
        self.is_published = input.is_published;
        self.updated_at = Utc::now();
    }
}

/// Comment entity. Owned by exactly one post, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, user_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content,
            created_at: Utc::now(),
        }
    }
}
