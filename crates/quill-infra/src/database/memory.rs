//! In-memory repositories - used as the fallback when no database is
//! configured, and by service-level tests. Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostQuery, PostRepository, UserRepository};

fn matches(post: &Post, query: &PostQuery) -> bool {
    if query.published_only && !post.is_published {
        return false;
    }
    if let Some(category_id) = query.category_id {
        if post.category_id != category_id {
            return false;
        }
    }
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let hit = post.title.to_lowercase().contains(&needle)
            || post.content.to_lowercase().contains(&needle)
            || post.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

/// In-memory post repository backed by a HashMap with an async RwLock.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let store = self.posts.read().await;
        let mut matching: Vec<Post> = store.values().filter(|p| matches(p, query)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let store = self.posts.read().await;
        Ok(store.values().filter(|p| matches(p, query)).count() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Post>, RepoError> {
        let id = Uuid::parse_str(key).ok();
        let store = self.posts.read().await;
        Ok(store
            .values()
            .find(|p| Some(p.id) == id || p.slug == key)
            .cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.posts.write().await;
        if store.values().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint("duplicate slug".to_string()));
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.posts.write().await;
        if store
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug)
        {
            return Err(RepoError::Constraint("duplicate slug".to_string()));
        }
        if !store.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.posts.write().await;
        if store.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Comments go with the post
        self.comments.write().await.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.posts.write().await;
        let post = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.view_count += 1;
        Ok(())
    }

    async fn comments_for(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let comments = self.comments.read().await;
        let mut matching: Vec<Comment> = comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn add_comment(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }
}

/// In-memory category repository.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let store = self.categories.read().await;
        let mut all: Vec<Category> = store.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Category>, RepoError> {
        let id = Uuid::parse_str(key).ok();
        let store = self.categories.read().await;
        Ok(store
            .values()
            .find(|c| Some(c.id) == id || c.slug == key)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let store = self.categories.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.categories.write().await;
        if store.values().any(|c| c.name == category.name) {
            return Err(RepoError::Constraint("duplicate name".to_string()));
        }
        store.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.categories.write().await;
        if store
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(RepoError::Constraint("duplicate name".to_string()));
        }
        if !store.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        store.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.categories.write().await;
        if store.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// In-memory user repository. Users are seeded, never created via the API.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user. Outside the repository contract on purpose: the API
    /// never writes users.
    pub async fn seed(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.users.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }
}
