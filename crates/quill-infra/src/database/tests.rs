#[cfg(test)]
mod tests {
    use crate::database::entity::post;
    use crate::database::postgres::{PostgresCategoryRepository, PostgresPostRepository};
    use quill_core::domain::Post;
    use quill_core::error::RepoError;
    use quill_core::ports::{CategoryRepository, PostRepository};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn sample_model(title: &str, slug: &str) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id: uuid::Uuid::new_v4(),
            title: title.to_owned(),
            content: "Some content long enough".to_owned(),
            excerpt: None,
            slug: slug.to_owned(),
            author_id: uuid::Uuid::new_v4(),
            category_id: uuid::Uuid::new_v4(),
            tags: vec!["rust".to_owned()],
            is_published: true,
            view_count: 3,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let model = sample_model("Test Post", "test-post");
        let post_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.title, "Test Post");
        assert_eq!(found.id, post_id);
        assert_eq!(found.view_count, 3);
    }

    #[tokio::test]
    async fn test_find_post_by_slug() {
        let model = sample_model("Hello World", "hello-world");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        // Not a UUID, so only the slug branch of the condition can match
        let result = repo.find_by_id_or_slug("hello-world").await.unwrap();
        assert_eq!(result.unwrap().slug, "hello-world");
    }

    #[tokio::test]
    async fn test_increment_views_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        repo.increment_views(uuid::Uuid::new_v4()).await.unwrap();
        assert!(matches!(
            repo.increment_views(uuid::Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(matches!(
            repo.delete(uuid::Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_category_maps_to_constraint() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Custom(
                "duplicate key value violates unique constraint \"categories_name_key\""
                    .to_owned(),
            )])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let category = quill_core::domain::Category::new(quill_shared::dto::CategoryInput {
            name: "Tech".to_owned(),
            description: None,
            color: None,
        });

        assert!(matches!(
            repo.insert(category).await,
            Err(RepoError::Constraint(_))
        ));
    }
}
