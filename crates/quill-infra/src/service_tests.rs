//! Service-level tests running the domain services over the in-memory
//! repositories.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::domain::{Role, User};
use quill_core::error::DomainError;
use quill_core::service::{CategoryService, PostService};
use quill_shared::dto::{CategoryInput, CommentInput, ListPostsQuery, PostInput, SearchQuery};

use crate::database::{
    InMemoryCategoryRepository, InMemoryPostRepository, InMemoryUserRepository,
};

struct Fixture {
    posts: PostService,
    categories: CategoryService,
    author: Uuid,
    admin: Uuid,
    other: Uuid,
    tech: String,
}

fn user(name: &str, role: Role) -> User {
    let now = chrono::Utc::now();
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        avatar: format!("https://avatars.example/{name}"),
        bio: Some(format!("{name} writes here")),
        role,
        created_at: now,
        updated_at: now,
    }
}

async fn fixture() -> Fixture {
    let post_repo = Arc::new(InMemoryPostRepository::new());
    let category_repo = Arc::new(InMemoryCategoryRepository::new());
    let user_repo = Arc::new(InMemoryUserRepository::new());

    let author = user("Ada", Role::User);
    let admin = user("Root", Role::Admin);
    let other = user("Eve", Role::User);
    let (author_id, admin_id, other_id) = (author.id, admin.id, other.id);
    user_repo.seed(author).await;
    user_repo.seed(admin).await;
    user_repo.seed(other).await;

    let posts = PostService::new(post_repo, category_repo.clone(), user_repo);
    let categories = CategoryService::new(category_repo);

    let tech = categories
        .create(CategoryInput {
            name: "Tech".to_string(),
            description: None,
            color: Some("#AABBCC".to_string()),
        })
        .await
        .unwrap();

    Fixture {
        posts,
        categories,
        author: author_id,
        admin: admin_id,
        other: other_id,
        tech: tech.id.to_string(),
    }
}

fn input(title: &str, category: &str) -> PostInput {
    PostInput {
        title: title.to_string(),
        content: "content long enough to pass".to_string(),
        excerpt: None,
        category: category.to_string(),
        tags: vec![],
        is_published: true,
    }
}

#[tokio::test]
async fn list_returns_only_published_newest_first() {
    let fx = fixture().await;

    for title in ["First post", "Second post", "Third post"] {
        fx.posts
            .create(fx.author, input(title, &fx.tech))
            .await
            .unwrap();
    }
    let mut draft = input("Hidden draft", &fx.tech);
    draft.is_published = false;
    fx.posts.create(fx.author, draft).await.unwrap();

    let (views, pagination) = fx.posts.list(ListPostsQuery::default()).await.unwrap();

    assert_eq!(views.len(), 3);
    assert!(views.iter().all(|v| v.is_published));
    assert_eq!(views[0].title, "Third post");
    assert_eq!(views[2].title, "First post");
    assert_eq!(pagination.total_posts, 3);
}

#[tokio::test]
async fn list_attaches_author_and_category() {
    let fx = fixture().await;
    fx.posts
        .create(fx.author, input("Attached", &fx.tech))
        .await
        .unwrap();

    let (views, _) = fx.posts.list(ListPostsQuery::default()).await.unwrap();

    let author = views[0].author.as_ref().unwrap();
    assert_eq!(author.name, "Ada");
    assert!(author.bio.is_none(), "listing omits the bio");
    let category = views[0].category.as_ref().unwrap();
    assert_eq!(category.name, "Tech");
    assert_eq!(category.color, "#AABBCC");
}

#[tokio::test]
async fn list_pagination_metadata() {
    let fx = fixture().await;
    for i in 0..25 {
        fx.posts
            .create(fx.author, input(&format!("Post number {i}"), &fx.tech))
            .await
            .unwrap();
    }

    let (views, pagination) = fx
        .posts
        .list(ListPostsQuery {
            page: Some(1),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(views.len(), 10);
    assert_eq!(pagination.total_pages, 3);
    assert_eq!(pagination.total_posts, 25);
    assert!(pagination.has_next_page);
    assert!(!pagination.has_prev_page);

    let (views, pagination) = fx
        .posts
        .list(ListPostsQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(views.len(), 5);
    assert!(!pagination.has_next_page);
    assert!(pagination.has_prev_page);
}

#[tokio::test]
async fn list_tolerates_huge_page_numbers() {
    let fx = fixture().await;
    fx.posts
        .create(fx.author, input("Only post", &fx.tech))
        .await
        .unwrap();

    // The offset must saturate instead of overflowing when page * limit
    // exceeds u64::MAX.
    let (views, pagination) = fx
        .posts
        .list(ListPostsQuery {
            page: Some(u64::MAX),
            limit: Some(100),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(views.is_empty());
    assert_eq!(pagination.total_posts, 1);
    assert!(!pagination.has_next_page);
    assert!(pagination.has_prev_page);
}

#[tokio::test]
async fn list_filters_by_category_and_search() {
    let fx = fixture().await;
    let food = fx
        .categories
        .create(CategoryInput {
            name: "Food".to_string(),
            description: None,
            color: None,
        })
        .await
        .unwrap();

    fx.posts
        .create(fx.author, input("Rust ownership explained", &fx.tech))
        .await
        .unwrap();
    let mut tagged = input("Weeknight dinners", &food.id.to_string());
    tagged.tags = vec!["cooking".to_string(), "rustic".to_string()];
    fx.posts.create(fx.author, tagged).await.unwrap();

    let (views, _) = fx
        .posts
        .list(ListPostsQuery {
            category: Some(food.id.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].title, "Weeknight dinners");

    // Case-insensitive, matches title OR tags
    let (views, pagination) = fx
        .posts
        .list(ListPostsQuery {
            search: Some("RUST".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(pagination.total_posts, 2);
}

#[tokio::test]
async fn get_unknown_is_not_found() {
    let fx = fixture().await;
    let err = fx.posts.get(&Uuid::new_v4().to_string()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    let err = fx.posts.get("no-such-slug").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn get_increments_view_count_per_call() {
    let fx = fixture().await;
    let created = fx
        .posts
        .create(fx.author, input("Counted post", &fx.tech))
        .await
        .unwrap();
    assert_eq!(created.view_count, 0);

    let by_id = fx.posts.get(&created.id.to_string()).await.unwrap();
    assert_eq!(by_id.view_count, 1);

    // Slug resolves to the same post and keeps counting
    let by_slug = fx.posts.get("counted-post").await.unwrap();
    assert_eq!(by_slug.view_count, 2);
    assert_eq!(
        by_slug.author.as_ref().unwrap().bio.as_deref(),
        Some("Ada writes here")
    );
}

#[tokio::test]
async fn create_validates_title_boundary() {
    let fx = fixture().await;

    let err = fx
        .posts
        .create(fx.author, input("ab", &fx.tech))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let ok = fx.posts.create(fx.author, input("abc", &fx.tech)).await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn create_rejects_unknown_category() {
    let fx = fixture().await;
    let err = fx
        .posts
        .create(fx.author, input("Valid title", &Uuid::new_v4().to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidReference(_)));
}

#[tokio::test]
async fn update_and_delete_enforce_owner_or_admin() {
    let fx = fixture().await;
    let created = fx
        .posts
        .create(fx.author, input("Owned post", &fx.tech))
        .await
        .unwrap();

    let err = fx
        .posts
        .update(fx.other, Role::User, created.id, input("Taken over", &fx.tech))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    let updated = fx
        .posts
        .update(fx.author, Role::User, created.id, input("Renamed post", &fx.tech))
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed post");
    assert_eq!(updated.slug, "renamed-post");

    let err = fx
        .posts
        .delete(fx.other, Role::User, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    fx.posts.delete(fx.admin, Role::Admin, created.id).await.unwrap();
    let err = fx
        .posts
        .delete(fx.author, Role::User, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn update_keeps_author_immutable() {
    let fx = fixture().await;
    let created = fx
        .posts
        .create(fx.author, input("Admin edited", &fx.tech))
        .await
        .unwrap();

    let updated = fx
        .posts
        .update(fx.admin, Role::Admin, created.id, input("Admin edit done", &fx.tech))
        .await
        .unwrap();

    assert_eq!(updated.author.unwrap().name, "Ada");
}

#[tokio::test]
async fn add_comment_validates_and_attaches_users() {
    let fx = fixture().await;
    let created = fx
        .posts
        .create(fx.author, input("Discussed post", &fx.tech))
        .await
        .unwrap();

    let err = fx
        .posts
        .add_comment(
            created.id,
            fx.other,
            CommentInput {
                content: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let comments = fx
        .posts
        .add_comment(
            created.id,
            fx.other,
            CommentInput {
                content: "Nice read".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "Nice read");
    assert_eq!(comments[0].user.as_ref().unwrap().name, "Eve");

    let err = fx
        .posts
        .add_comment(
            Uuid::new_v4(),
            fx.other,
            CommentInput {
                content: "Lost comment".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn search_requires_query_and_caps_results() {
    let fx = fixture().await;

    let err = fx
        .posts
        .search(SearchQuery { q: "  ".to_string() })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    for i in 0..25 {
        fx.posts
            .create(fx.author, input(&format!("Rust tip {i}"), &fx.tech))
            .await
            .unwrap();
    }
    let mut draft = input("Rust draft only", &fx.tech);
    draft.is_published = false;
    fx.posts.create(fx.author, draft).await.unwrap();

    let views = fx
        .posts
        .search(SearchQuery {
            q: "rust".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(views.len(), 20, "capped at 20 even though 25 match");
    assert!(views.iter().all(|v| v.is_published));
}

#[tokio::test]
async fn category_duplicate_name_is_rejected() {
    let fx = fixture().await;

    let err = fx
        .categories
        .create(CategoryInput {
            name: "Tech".to_string(),
            description: None,
            color: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));

    let life = fx
        .categories
        .create(CategoryInput {
            name: "Life".to_string(),
            description: None,
            color: None,
        })
        .await
        .unwrap();
    let err = fx
        .categories
        .update(
            life.id,
            CategoryInput {
                name: "Tech".to_string(),
                description: None,
                color: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn categories_list_sorted_and_resolvable_by_slug() {
    let fx = fixture().await;
    for name in ["Zebra stripes", "Answers"] {
        fx.categories
            .create(CategoryInput {
                name: name.to_string(),
                description: None,
                color: None,
            })
            .await
            .unwrap();
    }

    let all = fx.categories.list().await.unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Answers", "Tech", "Zebra stripes"]);

    let by_slug = fx.categories.get("zebra-stripes").await.unwrap();
    assert_eq!(by_slug.name, "Zebra stripes");
}

#[tokio::test]
async fn category_delete_leaves_dangling_reference() {
    let fx = fixture().await;
    let tech_id = Uuid::parse_str(&fx.tech).unwrap();
    fx.posts
        .create(fx.author, input("Orphaned post", &fx.tech))
        .await
        .unwrap();

    fx.categories.delete(tech_id).await.unwrap();
    let err = fx.categories.delete(tech_id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    // The post survives with its category simply omitted
    let (views, _) = fx.posts.list(ListPostsQuery::default()).await.unwrap();
    assert_eq!(views.len(), 1);
    assert!(views[0].category.is_none());
}

#[tokio::test]
async fn end_to_end_category_post_get() {
    let fx = fixture().await;
    let mut body = input("Hello World", &fx.tech);
    body.content = "1234567890".to_string();

    let created = fx.posts.create(fx.author, body).await.unwrap();
    let fetched = fx.posts.get(&created.id.to_string()).await.unwrap();

    assert_eq!(fetched.view_count, 1);
    assert_eq!(fetched.category.unwrap().name, "Tech");
    assert_eq!(fetched.slug, "hello-world");
}
