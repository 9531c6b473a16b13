//! Post service - listing, lookup, CRUD, comments, and search.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use quill_shared::dto::{
    AuthorRef, CategoryRef, CommentInput, CommentView, ListPostsQuery, PostInput, PostView,
    SearchQuery,
};
use quill_shared::response::Pagination;

use crate::domain::{Category, Comment, Post, Role, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, PostQuery, PostRepository, UserRepository};
use crate::validate;

const DEFAULT_PAGE_SIZE: u64 = 10;
/// Upper clamp on caller-supplied page sizes.
const MAX_PAGE_SIZE: u64 = 100;
/// Ad-hoc search returns at most this many posts, no pagination.
const SEARCH_LIMIT: u64 = 20;

/// Post operations over the repository ports.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            users,
        }
    }

    /// One page of published posts, newest first, with author and category
    /// attached.
    pub async fn list(
        &self,
        query: ListPostsQuery,
    ) -> Result<(Vec<PostView>, Pagination), DomainError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let category_id = match query.category.as_deref() {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| DomainError::validation("category must be a valid id"))?,
            ),
            None => None,
        };

        let filter = PostQuery {
            published_only: true,
            category_id,
            search: query.search.filter(|s| !s.trim().is_empty()),
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        };

        let posts = self.posts.find_page(&filter).await?;
        let total = self.posts.count(&filter).await?;

        let views = self.attach_many(posts).await?;
        Ok((views, paginate(page, limit, total)))
    }

    /// Resolve a post by id or slug, bump its view counter, and return it
    /// with author (incl. bio), category, and comments attached.
    pub async fn get(&self, key: &str) -> Result<PostView, DomainError> {
        let mut post = self
            .posts
            .find_by_id_or_slug(key)
            .await?
            .ok_or(DomainError::not_found("Post"))?;

        // Single-statement bump; the fetched copy is adjusted to match so the
        // caller sees the count including their own view.
        self.posts.increment_views(post.id).await?;
        post.view_count += 1;

        let author = self.users.find_by_id(post.author_id).await?;
        let category = self.categories.find_by_id(post.category_id).await?;
        let comments = self.attach_comments(post.id).await?;

        Ok(view(post, author.as_ref(), true, category.as_ref(), comments))
    }

    /// Create a post owned by `author_id`.
    pub async fn create(&self, author_id: Uuid, input: PostInput) -> Result<PostView, DomainError> {
        validate::post_input(&input)?;
        let category = self.resolve_category(&input.category).await?;

        let post = Post::new(author_id, category.id, input);
        let post = self.posts.insert(post).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Duplicate("Post with this title already exists".to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

        let author = self.users.find_by_id(post.author_id).await?;
        Ok(view(
            post,
            author.as_ref(),
            false,
            Some(&category),
            Vec::new(),
        ))
    }

    /// Full-document update. Only the author or an admin may update.
    pub async fn update(
        &self,
        requester_id: Uuid,
        requester_role: Role,
        post_id: Uuid,
        input: PostInput,
    ) -> Result<PostView, DomainError> {
        validate::post_input(&input)?;

        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("Post"))?;
        authorize(&post, requester_id, requester_role, "update")?;

        let category = self.resolve_category(&input.category).await?;
        post.apply(category.id, input);

        let post = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post"),
            RepoError::Constraint(_) => {
                DomainError::Duplicate("Post with this title already exists".to_string())
            }
            other => other.into(),
        })?;

        let author = self.users.find_by_id(post.author_id).await?;
        Ok(view(
            post,
            author.as_ref(),
            false,
            Some(&category),
            Vec::new(),
        ))
    }

    /// Hard-delete a post. Only the author or an admin may delete.
    pub async fn delete(
        &self,
        requester_id: Uuid,
        requester_role: Role,
        post_id: Uuid,
    ) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("Post"))?;
        authorize(&post, requester_id, requester_role, "delete")?;

        self.posts.delete(post_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post"),
            other => other.into(),
        })?;

        tracing::info!(post_id = %post_id, "post deleted");
        Ok(())
    }

    /// Append a comment and return the post's full comment list with users
    /// attached.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        input: CommentInput,
    ) -> Result<Vec<CommentView>, DomainError> {
        validate::comment_input(&input)?;

        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::not_found("Post"))?;

        self.posts
            .add_comment(Comment::new(post_id, user_id, input.content))
            .await?;

        self.attach_comments(post_id).await
    }

    /// Ad-hoc search over published posts, capped at 20 results.
    pub async fn search(&self, query: SearchQuery) -> Result<Vec<PostView>, DomainError> {
        let q = query.q.trim();
        if q.is_empty() {
            return Err(DomainError::validation("Search query is required"));
        }

        let filter = PostQuery {
            published_only: true,
            category_id: None,
            search: Some(q.to_string()),
            offset: 0,
            limit: SEARCH_LIMIT,
        };

        let posts = self.posts.find_page(&filter).await?;
        self.attach_many(posts).await
    }

    async fn resolve_category(&self, raw: &str) -> Result<Category, DomainError> {
        let not_found = || DomainError::InvalidReference("Category not found".to_string());
        let id = Uuid::parse_str(raw).map_err(|_| not_found())?;
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)
    }

    /// Attach authors and categories to a batch of posts.
    async fn attach_many(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let author_ids: Vec<Uuid> = posts
            .iter()
            .map(|p| p.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let category_ids: Vec<Uuid> = posts
            .iter()
            .map(|p| p.category_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<Uuid, User> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let categories: HashMap<Uuid, Category> = self
            .categories
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id);
                let category = categories.get(&post.category_id);
                view(post, author, false, category, Vec::new())
            })
            .collect())
    }

    async fn attach_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        let comments = self.posts.comments_for(post_id).await?;

        let user_ids: Vec<Uuid> = comments
            .iter()
            .map(|c| c.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users: HashMap<Uuid, User> = self
            .users
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(comments
            .into_iter()
            .map(|c| CommentView {
                id: c.id,
                user: users.get(&c.user_id).map(|u| author_ref(u, false)),
                content: c.content,
                created_at: c.created_at,
            })
            .collect())
    }
}

fn authorize(
    post: &Post,
    requester_id: Uuid,
    requester_role: Role,
    action: &'static str,
) -> Result<(), DomainError> {
    if post.author_id == requester_id || requester_role.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden {
            action,
            entity: "post",
        })
    }
}

fn paginate(page: u64, limit: u64, total: u64) -> Pagination {
    let total_pages = total.div_ceil(limit);
    Pagination {
        current_page: page,
        total_pages,
        total_posts: total,
        has_next_page: page < total_pages,
        has_prev_page: page > 1,
    }
}

fn author_ref(user: &User, with_bio: bool) -> AuthorRef {
    AuthorRef {
        id: user.id,
        name: user.name.clone(),
        avatar: user.avatar.clone(),
        bio: if with_bio { user.bio.clone() } else { None },
    }
}

fn view(
    post: Post,
    author: Option<&User>,
    with_bio: bool,
    category: Option<&Category>,
    comments: Vec<CommentView>,
) -> PostView {
    PostView {
        id: post.id,
        title: post.title,
        content: post.content,
        excerpt: post.excerpt,
        slug: post.slug,
        tags: post.tags,
        is_published: post.is_published,
        view_count: post.view_count,
        author: author.map(|u| author_ref(u, with_bio)),
        category: category.map(|c| CategoryRef {
            id: c.id,
            name: c.name.clone(),
            color: c.color.clone(),
        }),
        comments,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::paginate;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(paginate(1, 10, 0).total_pages, 0);
        assert_eq!(paginate(1, 10, 10).total_pages, 1);
        assert_eq!(paginate(1, 10, 11).total_pages, 2);
        assert_eq!(paginate(1, 3, 7).total_pages, 3);
    }

    #[test]
    fn next_and_prev_flags() {
        let first = paginate(1, 10, 25);
        assert!(first.has_next_page);
        assert!(!first.has_prev_page);

        let middle = paginate(2, 10, 25);
        assert!(middle.has_next_page);
        assert!(middle.has_prev_page);

        let last = paginate(3, 10, 25);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);
    }

    #[test]
    fn page_past_the_end_has_no_next() {
        let past = paginate(9, 10, 25);
        assert!(!past.has_next_page);
        assert!(past.has_prev_page);
    }
}
