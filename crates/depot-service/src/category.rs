//! Category operations.

use tracing::{info, warn};

use depot_core::validation::{validate_category_name, validate_description};
use depot_core::{Category, EntityId};
use depot_db::{CategoryStore, DbError};

use crate::error::{ensure_persisted, ServiceError, ServiceResult};

/// Business operations on categories.
#[derive(Debug, Clone)]
pub struct CategoryService<R> {
    repo: R,
}

impl<R: CategoryStore> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        CategoryService { repo }
    }

    /// All categories, ordered by name.
    pub async fn find_all(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.find_all().await?)
    }

    /// Active categories, ordered by name.
    pub async fn find_all_active(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.find_all_active().await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Option<Category>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// Creates an active category and returns it with its assigned id.
    pub async fn create(&self, name: &str, description: &str) -> ServiceResult<Category> {
        let category = Category::new(
            validate_category_name(name)?,
            validate_description(description)?,
        )?;

        let inserted = self
            .repo
            .create(&category)
            .await
            .map_err(|e| ServiceError::duplicate_or_storage(e, "Category", &category.name))?;
        if !inserted {
            return Err(DbError::QueryFailed(format!(
                "category '{}' was not inserted",
                category.name
            ))
            .into());
        }

        let created = self
            .repo
            .find_by_name(&category.name)
            .await?
            .ok_or_else(|| DbError::not_found("Category", &category.name))?;

        info!(id = created.id, name = %created.name, "Category created");
        Ok(created)
    }

    /// Replaces the stored category. `false` if it no longer exists.
    pub async fn update(&self, category: &Category) -> ServiceResult<bool> {
        ensure_persisted(category.id, "Category")?;

        let normalized = Category {
            name: validate_category_name(&category.name)?,
            description: validate_description(&category.description)?,
            ..category.clone()
        }
        .validated()?;

        Ok(self
            .repo
            .update(&normalized)
            .await
            .map_err(|e| ServiceError::duplicate_or_storage(e, "Category", &normalized.name))?)
    }

    /// Deletes a category. Categories that still have products are refused
    /// by the store with a foreign key violation.
    pub async fn delete(&self, id: EntityId) -> ServiceResult<bool> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            info!(id, "Category deleted");
        }
        Ok(deleted)
    }

    /// Flips the active flag. `false` if the category does not exist, in
    /// which case nothing is written.
    pub async fn toggle_active(&self, id: EntityId) -> ServiceResult<bool> {
        let Some(category) = self.repo.find_by_id(id).await? else {
            warn!(id, "Cannot toggle unknown category");
            return Ok(false);
        };

        let toggled = category.toggled();
        let updated = self.repo.update(&toggled).await?;
        if updated {
            info!(id, active = toggled.active, "Category toggled");
        }
        Ok(updated)
    }
}
