//! Category service - simple CRUD, no pagination.

use std::sync::Arc;

use uuid::Uuid;

use quill_shared::dto::CategoryInput;

use crate::domain::Category;
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;
use crate::validate;

const DUPLICATE_NAME: &str = "Category with this name already exists";

/// Category operations. Admin enforcement happens in the API layer.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// All categories, name ascending.
    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.find_all().await?)
    }

    /// Resolve a category by id or slug.
    pub async fn get(&self, key: &str) -> Result<Category, DomainError> {
        self.categories
            .find_by_id_or_slug(key)
            .await?
            .ok_or(DomainError::not_found("Category"))
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category, DomainError> {
        validate::category_input(&input)?;

        let category = Category::new(input);
        self.categories
            .insert(category)
            .await
            .map_err(map_duplicate)
    }

    pub async fn update(&self, id: Uuid, input: CategoryInput) -> Result<Category, DomainError> {
        validate::category_input(&input)?;

        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Category"))?;
        category.apply(input);

        self.categories
            .update(category)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("Category"),
                other => map_duplicate(other),
            })
    }

    /// Unconditional hard delete. Posts still referencing the category keep
    /// their dangling reference; attachment then simply omits the category.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Category"))?;

        self.categories.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Category"),
            other => other.into(),
        })
    }
}

fn map_duplicate(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::Duplicate(DUPLICATE_NAME.to_string()),
        other => other.into(),
    }
}
