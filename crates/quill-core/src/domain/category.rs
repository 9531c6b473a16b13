use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_shared::dto::CategoryInput;

use super::slug::slugify;

/// Category entity. Name is unique; the slug is derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const DEFAULT_COLOR: &str = "#3B82F6";

impl Category {
    /// Create a new category from validated input.
    pub fn new(input: CategoryInput) -> Self {
        let now = Utc::now();
        let slug = slugify(&input.name);
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            slug,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields with validated input, regenerating the slug.
    pub fn apply(&mut self, input: CategoryInput) {
        self.slug = slugify(&input.name);
        self.name = input.name;
        self.description = input.description;
        if let Some(color) = input.color {
            self.color = color;
        }
        self.updated_at = Utc::now();
    }
}
