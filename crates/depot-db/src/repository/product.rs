//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Lookups by SKU, by category and below the reorder threshold
//! - Atomic stock updates
//!
//! ## Atomic Stock Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ Read status in Rust, write stock and status separately          │
//! │     (a concurrent writer can leave them disagreeing)               │
//! │                                                                     │
//! │  ✅ One statement writes both:                                      │
//! │     UPDATE products SET stock = ?, status = CASE ... END           │
//! │                                                                     │
//! │  The CASE mirrors depot_core::derive_status:                       │
//! │     stock = 0          → OUT_OF_STOCK                              │
//! │     stock <= min_stock → LOW_STOCK                                 │
//! │     otherwise          → AVAILABLE                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `update_stock` is last-write-wins. `update_stock_if` adds a
//! compare-and-swap guard on the current stock for callers that must not
//! lose concurrent updates.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

use depot_core::{EntityId, Money, Product, ProductStatus};

use super::{MapRow, ProductStore, Repository, SqlExecutor, SqliteQuery};
use crate::connection::ConnectionFactory;
use crate::error::DbResult;

const UPDATE_STOCK_SQL: &str = r#"
    UPDATE products
    SET
        stock = ?1,
        status = CASE
            WHEN ?1 = 0 THEN ?2
            WHEN ?1 <= min_stock THEN ?3
            ELSE ?4
        END,
        last_update = ?5
    WHERE id = ?6
"#;

const UPDATE_STOCK_IF_SQL: &str = r#"
    UPDATE products
    SET
        stock = ?1,
        status = CASE
            WHEN ?1 = 0 THEN ?2
            WHEN ?1 <= min_stock THEN ?3
            ELSE ?4
        END,
        last_update = ?5
    WHERE id = ?6 AND stock = ?7
"#;

impl MapRow for Product {
    fn map_row(row: &SqliteRow) -> DbResult<Self> {
        Ok(Product {
            id: row.try_get("id")?,
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            stock: row.try_get("stock")?,
            reserved_stock: row.try_get("reserved_stock")?,
            min_stock: row.try_get("min_stock")?,
            location: row.try_get("location")?,
            status: row.try_get("status")?,
            category_id: row.try_get("category_id")?,
            last_update: row.try_get("last_update")?,
        }
        .validated()?)
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.find_by_sku("LAPTOP-001").await?;
/// let to_reorder = repo.find_low_stock().await?;
/// repo.update_stock(product_id, 40).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    executor: SqlExecutor,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        ProductRepository {
            executor: SqlExecutor::new(factory),
        }
    }

    /// Binds the status names used by the stock-update CASE expression.
    fn stock_update(sql: &'static str, id: EntityId, new_stock: i64) -> SqliteQuery<'static> {
        sqlx::query(sql)
            .bind(new_stock)
            .bind(ProductStatus::OutOfStock.as_str())
            .bind(ProductStatus::LowStock.as_str())
            .bind(ProductStatus::Available.as_str())
            .bind(Utc::now())
            .bind(id)
    }
}

#[async_trait]
impl Repository<Product, EntityId> for ProductRepository {
    /// Inserts a new product.
    ///
    /// `last_update` is stamped here; the entity's own value is ignored.
    /// A duplicate SKU fails with `DbError::UniqueViolation`.
    async fn create(&self, product: &Product) -> DbResult<bool> {
        debug!(sku = %product.sku, "Inserting product");

        let affected = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO products (
                        sku, name, description, price_cents, stock, reserved_stock,
                        min_stock, location, status, category_id, last_update
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                    "#,
                )
                .bind(&product.sku)
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price.cents())
                .bind(product.stock)
                .bind(product.reserved_stock)
                .bind(product.min_stock)
                .bind(&product.location)
                .bind(product.status)
                .bind(product.category_id)
                .bind(Utc::now()),
            )
            .await?;

        Ok(affected == 1)
    }

    /// Replaces every mutable column, including `status` exactly as given.
    async fn update(&self, product: &Product) -> DbResult<bool> {
        debug!(id = product.id, sku = %product.sku, "Updating product");

        let affected = self
            .executor
            .execute(
                sqlx::query(
                    r#"
                    UPDATE products SET
                        sku = ?2,
                        name = ?3,
                        description = ?4,
                        price_cents = ?5,
                        stock = ?6,
                        reserved_stock = ?7,
                        min_stock = ?8,
                        location = ?9,
                        status = ?10,
                        category_id = ?11,
                        last_update = ?12
                    WHERE id = ?1
                    "#,
                )
                .bind(product.id)
                .bind(&product.sku)
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price.cents())
                .bind(product.stock)
                .bind(product.reserved_stock)
                .bind(product.min_stock)
                .bind(&product.location)
                .bind(product.status)
                .bind(product.category_id)
                .bind(Utc::now()),
            )
            .await?;

        Ok(affected > 0)
    }

    async fn delete(&self, id: EntityId) -> DbResult<bool> {
        debug!(id, "Deleting product");

        let affected = self
            .executor
            .execute(sqlx::query("DELETE FROM products WHERE id = ?1").bind(id))
            .await?;

        Ok(affected > 0)
    }

    async fn find_by_id(&self, id: EntityId) -> DbResult<Option<Product>> {
        self.executor
            .fetch_optional(sqlx::query("SELECT * FROM products WHERE id = ?1").bind(id))
            .await
    }

    async fn find_all(&self) -> DbResult<Vec<Product>> {
        self.executor
            .fetch_all(sqlx::query("SELECT * FROM products ORDER BY name"))
            .await
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        self.executor
            .fetch_optional(sqlx::query("SELECT * FROM products WHERE sku = ?1").bind(sku))
            .await
    }

    async fn find_by_category(&self, category_id: EntityId) -> DbResult<Vec<Product>> {
        self.executor
            .fetch_all(
                sqlx::query("SELECT * FROM products WHERE category_id = ?1 ORDER BY name")
                    .bind(category_id),
            )
            .await
    }

    async fn find_low_stock(&self) -> DbResult<Vec<Product>> {
        self.executor
            .fetch_all(sqlx::query(
                "SELECT * FROM products WHERE stock <= min_stock ORDER BY stock ASC, name",
            ))
            .await
    }

    async fn update_stock(&self, id: EntityId, new_stock: i64) -> DbResult<bool> {
        debug!(id, new_stock, "Updating stock");

        let affected = self
            .executor
            .execute(Self::stock_update(UPDATE_STOCK_SQL, id, new_stock))
            .await?;

        Ok(affected > 0)
    }

    async fn update_stock_if(
        &self,
        id: EntityId,
        expected: i64,
        new_stock: i64,
    ) -> DbResult<bool> {
        debug!(id, expected, new_stock, "Updating stock if unchanged");

        let affected = self
            .executor
            .execute(Self::stock_update(UPDATE_STOCK_IF_SQL, id, new_stock).bind(expected))
            .await?;

        Ok(affected > 0)
    }

    async fn count(&self) -> DbResult<i64> {
        self.executor
            .count(sqlx::query("SELECT COUNT(*) FROM products"))
            .await
    }
}
