//! # Category Repository
//!
//! Database operations for categories.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

use depot_core::{Category, EntityId};

use super::{CategoryStore, MapRow, Repository, SqlExecutor};
use crate::connection::ConnectionFactory;
use crate::error::DbResult;

impl MapRow for Category {
    fn map_row(row: &SqliteRow) -> DbResult<Self> {
        Ok(Category {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            active: row.try_get("active")?,
        }
        .validated()?)
    }
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    executor: SqlExecutor,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        CategoryRepository {
            executor: SqlExecutor::new(factory),
        }
    }
}

#[async_trait]
impl Repository<Category, EntityId> for CategoryRepository {
    async fn create(&self, category: &Category) -> DbResult<bool> {
        debug!(name = %category.name, "Inserting category");

        let affected = self
            .executor
            .execute(
                sqlx::query(
                    "INSERT INTO categories (name, description, active) VALUES (?1, ?2, ?3)",
                )
                .bind(&category.name)
                .bind(&category.description)
                .bind(category.active),
            )
            .await?;

        Ok(affected == 1)
    }

    async fn update(&self, category: &Category) -> DbResult<bool> {
        debug!(id = category.id, "Updating category");

        let affected = self
            .executor
            .execute(
                sqlx::query(
                    "UPDATE categories SET name = ?2, description = ?3, active = ?4 WHERE id = ?1",
                )
                .bind(category.id)
                .bind(&category.name)
                .bind(&category.description)
                .bind(category.active),
            )
            .await?;

        Ok(affected > 0)
    }

    async fn delete(&self, id: EntityId) -> DbResult<bool> {
        debug!(id, "Deleting category");

        let affected = self
            .executor
            .execute(sqlx::query("DELETE FROM categories WHERE id = ?1").bind(id))
            .await?;

        Ok(affected > 0)
    }

    async fn find_by_id(&self, id: EntityId) -> DbResult<Option<Category>> {
        self.executor
            .fetch_optional(sqlx::query("SELECT * FROM categories WHERE id = ?1").bind(id))
            .await
    }

    async fn find_all(&self) -> DbResult<Vec<Category>> {
        self.executor
            .fetch_all(sqlx::query("SELECT * FROM categories ORDER BY name"))
            .await
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn find_all_active(&self) -> DbResult<Vec<Category>> {
        self.executor
            .fetch_all(sqlx::query(
                "SELECT * FROM categories WHERE active = 1 ORDER BY name",
            ))
            .await
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        self.executor
            .fetch_optional(sqlx::query("SELECT * FROM categories WHERE name = ?1").bind(name))
            .await
    }

    async fn exists(&self, id: EntityId) -> DbResult<bool> {
        self.executor.exists("categories", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::DbError;

    #[tokio::test]
    async fn test_create_and_find() {
        let db = scratch().await;
        let repo = db.categories();

        let category = seed_category(&db, "Electronics").await;
        assert!(category.id > 0);
        assert!(category.active);

        let found = repo.find_by_id(category.id).await.unwrap().unwrap();
        assert_eq!(found, category);
        assert!(repo.find_by_id(category.id + 100).await.unwrap().is_none());
        assert!(repo.exists(category.id).await.unwrap());
        assert!(!repo.exists(category.id + 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let db = scratch().await;
        let repo = db.categories();
        seed_category(&db, "Books").await;

        let err = repo
            .create(&Category::new("Books", "again").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_unique_violation(), "{err:?}");
    }

    #[tokio::test]
    async fn test_find_all_orders_by_name_and_filters_active() {
        let db = scratch().await;
        let repo = db.categories();
        seed_category(&db, "Zinc").await;
        let apparel = seed_category(&db, "Apparel").await;
        seed_category(&db, "Garden").await;

        assert!(repo.update(&apparel.with_active(false)).await.unwrap());

        let all: Vec<String> = repo.find_all().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(all, ["Apparel", "Garden", "Zinc"]);

        let active: Vec<String> = repo
            .find_all_active()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(active, ["Garden", "Zinc"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_rows() {
        let db = scratch().await;
        let repo = db.categories();

        let mut ghost = Category::new("Ghost", "").unwrap();
        ghost.id = 42;
        assert!(!repo.update(&ghost).await.unwrap());
        assert!(!repo.delete(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_referenced_category_is_blocked() {
        let db = scratch().await;
        let repo = db.categories();
        let category = seed_category(&db, "Food").await;
        seed_product(&db, "FOOD-001", 10, 2, category.id).await;

        let err = repo.delete(category.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "{err:?}");

        let empty = seed_category(&db, "Empty").await;
        assert!(repo.delete(empty.id).await.unwrap());
        assert!(repo.find_by_id(empty.id).await.unwrap().is_none());
    }
}
