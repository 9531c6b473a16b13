//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CategoryRepository, PostRepository, UserRepository};
use quill_core::service::{CategoryService, PostService};
use quill_infra::database::{
    DatabaseConfig, DatabaseConnections, InMemoryCategoryRepository, InMemoryPostRepository,
    InMemoryUserRepository, PostgresCategoryRepository, PostgresPostRepository,
    PostgresUserRepository,
};

type Repos = (
    Arc<dyn PostRepository>,
    Arc<dyn CategoryRepository>,
    Arc<dyn UserRepository>,
);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        let (post_repo, category_repo, user_repo) = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let db = connections.main;
                    (
                        Arc::new(PostgresPostRepository::new(db.clone())) as Arc<dyn PostRepository>,
                        Arc::new(PostgresCategoryRepository::new(db.clone()))
                            as Arc<dyn CategoryRepository>,
                        Arc::new(PostgresUserRepository::new(db)) as Arc<dyn UserRepository>,
                    )
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_repos()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_repos()
            }
        };

        let posts = Arc::new(PostService::new(
            post_repo,
            category_repo.clone(),
            user_repo,
        ));
        let categories = Arc::new(CategoryService::new(category_repo));

        tracing::info!("Application state initialized");

        Self { posts, categories }
    }
}

fn in_memory_repos() -> Repos {
    (
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryCategoryRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    )
}
