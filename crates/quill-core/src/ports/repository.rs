use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, User};
use crate::error::RepoError;

/// Filter and window for post listing queries.
///
/// `search` is a case-insensitive substring matched against title, content,
/// or any tag.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub published_only: bool,
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    pub offset: u64,
    pub limit: u64,
}

/// Post repository, including the comments owned by each post.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch one page of matching posts, newest first.
    async fn find_page(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Count all posts matching the filter, ignoring the window.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Resolve a post by id or slug, whichever matches.
    async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Post>, RepoError>;

    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Full-document replacement. `RepoError::NotFound` if the row is gone.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Hard delete. Comments go with the post.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Bump the view counter by one in a single statement.
    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError>;

    /// All comments on a post, oldest first.
    async fn comments_for(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn add_comment(&self, comment: Comment) -> Result<Comment, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, name ascending.
    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Category>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError>;

    /// `RepoError::Constraint` on a duplicate name.
    async fn insert(&self, category: Category) -> Result<Category, RepoError>;

    async fn update(&self, category: Category) -> Result<Category, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// User repository. Read-only: identity is managed externally.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}
