//! # Repository Module
//!
//! The generic persistence contract and its SQLite implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layers                                    │
//! │                                                                         │
//! │  Service Facade                                                        │
//! │       │  products.find_low_stock()                                     │
//! │       ▼                                                                 │
//! │  Repository<T, ID>        create / update / delete / find_*            │
//! │  + ProductStore etc.      entity-specific finders and stock updates    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlExecutor              connect → one statement → close              │
//! │       │                   rows mapped through MapRow                   │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`] - Categories and the active flag
//! - [`ProductRepository`] - Products, low-stock lookups, atomic stock updates
//! - [`UserRepository`] - Accounts by username and role

pub mod category;
pub mod product;
pub mod user;

pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite};
use std::sync::Arc;

use depot_core::{Category, EntityId, Product, User, UserRole};

use crate::connection::{release, ConnectionFactory};
use crate::error::DbResult;

/// A prepared SQLite statement with its bound arguments.
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

// =============================================================================
// Generic Contract
// =============================================================================

/// CRUD contract shared by every entity store.
///
/// Mutations report whether a row was affected. Lookups return `Ok(None)`
/// when nothing matches; storage failures are always `Err`.
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Inserts a new row. `true` iff exactly one row was inserted.
    async fn create(&self, entity: &T) -> DbResult<bool>;

    /// Replaces every mutable column of the row with the entity's id.
    async fn update(&self, entity: &T) -> DbResult<bool>;

    /// Removes the row. Rows still referenced by others fail with
    /// [`DbError::ForeignKeyViolation`](crate::DbError::ForeignKeyViolation).
    async fn delete(&self, id: ID) -> DbResult<bool>;

    async fn find_by_id(&self, id: ID) -> DbResult<Option<T>>;

    /// All rows in the store's natural order.
    async fn find_all(&self) -> DbResult<Vec<T>>;
}

/// Category-specific queries.
#[async_trait]
pub trait CategoryStore: Repository<Category, EntityId> {
    /// Active categories, ordered by name.
    async fn find_all_active(&self) -> DbResult<Vec<Category>>;

    async fn find_by_name(&self, name: &str) -> DbResult<Option<Category>>;

    /// True if a category with this id exists, active or not.
    async fn exists(&self, id: EntityId) -> DbResult<bool>;
}

/// Product-specific queries and stock updates.
#[async_trait]
pub trait ProductStore: Repository<Product, EntityId> {
    async fn find_by_sku(&self, sku: &str) -> DbResult<Option<Product>>;

    /// Products of one category, ordered by name.
    async fn find_by_category(&self, category_id: EntityId) -> DbResult<Vec<Product>>;

    /// Products with `stock <= min_stock`, lowest stock first.
    async fn find_low_stock(&self) -> DbResult<Vec<Product>>;

    /// Sets the on-hand quantity and recomputes the status in the same
    /// statement. Last write wins.
    async fn update_stock(&self, id: EntityId, new_stock: i64) -> DbResult<bool>;

    /// Like [`ProductStore::update_stock`], but only if the current stock is
    /// still `expected`. `false` when the product is missing or was changed
    /// concurrently.
    async fn update_stock_if(&self, id: EntityId, expected: i64, new_stock: i64)
        -> DbResult<bool>;

    async fn count(&self) -> DbResult<i64>;
}

/// User-specific queries.
#[async_trait]
pub trait UserStore: Repository<User, EntityId> {
    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>>;

    /// Users holding `role`, ordered by username.
    async fn find_by_role(&self, role: UserRole) -> DbResult<Vec<User>>;
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Turns one result row into an entity.
///
/// Implementations read columns by name with `try_get`, so a missing or
/// mistyped column becomes [`DbError::Mapping`](crate::DbError::Mapping)
/// rather than a default value, and re-check the entity's invariants.
pub trait MapRow: Sized {
    fn map_row(row: &SqliteRow) -> DbResult<Self>;
}

// =============================================================================
// Shared Executor
// =============================================================================

/// Runs single statements on short-lived connections.
///
/// Every method opens a connection, runs exactly one statement and closes
/// the connection before returning, whether the statement succeeded, failed,
/// or its rows could not be mapped.
#[derive(Debug, Clone)]
pub struct SqlExecutor {
    factory: Arc<dyn ConnectionFactory>,
}

impl SqlExecutor {
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        SqlExecutor { factory }
    }

    /// Executes a mutation, returning the number of affected rows.
    pub async fn execute(&self, query: SqliteQuery<'_>) -> DbResult<u64> {
        let mut conn = self.factory.connect().await?;
        let result = query.execute(&mut conn).await;
        release(conn).await;
        Ok(result?.rows_affected())
    }

    /// Fetches at most one row.
    pub async fn fetch_optional<T: MapRow>(&self, query: SqliteQuery<'_>) -> DbResult<Option<T>> {
        let mut conn = self.factory.connect().await?;
        let result = query.fetch_optional(&mut conn).await;
        release(conn).await;
        result?.as_ref().map(T::map_row).transpose()
    }

    /// Fetches every row.
    pub async fn fetch_all<T: MapRow>(&self, query: SqliteQuery<'_>) -> DbResult<Vec<T>> {
        let mut conn = self.factory.connect().await?;
        let result = query.fetch_all(&mut conn).await;
        release(conn).await;
        result?.iter().map(T::map_row).collect()
    }

    /// Runs a `SELECT COUNT(*) ...` statement.
    pub async fn count(&self, query: SqliteQuery<'_>) -> DbResult<i64> {
        let mut conn = self.factory.connect().await?;
        let result = query.fetch_one(&mut conn).await;
        release(conn).await;
        Ok(result?.try_get(0)?)
    }

    /// True if `table` has a row with this id.
    ///
    /// `table` must be a trusted identifier; it is spliced into the SQL.
    pub async fn exists(&self, table: &'static str, id: EntityId) -> DbResult<bool> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE id = ?");
        let count = self.count(sqlx::query(&sql).bind(id)).await?;
        Ok(count > 0)
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use depot_core::{Money, ProductDraft};

    use crate::connection::{Database, ScratchDatabase};

    use super::*;

    /// A migrated database in a scratch file, deleted when dropped.
    pub async fn scratch() -> ScratchDatabase {
        ScratchDatabase::open().await.expect("scratch database")
    }

    /// Inserts a category and returns it with its assigned id.
    pub async fn seed_category(db: &Database, name: &str) -> Category {
        let repo = db.categories();
        let category = Category::new(name, "test category").unwrap();
        assert!(repo.create(&category).await.unwrap());
        repo.find_by_name(name).await.unwrap().unwrap()
    }

    pub fn product(sku: &str, stock: i64, min_stock: i64, category_id: EntityId) -> Product {
        Product::new(ProductDraft {
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            description: String::new(),
            price: Money::from_cents(1_000),
            stock,
            min_stock,
            location: "A-01".to_string(),
            category_id,
        })
        .unwrap()
    }

    /// Inserts a product and returns it with its assigned id.
    pub async fn seed_product(
        db: &Database,
        sku: &str,
        stock: i64,
        min_stock: i64,
        category_id: EntityId,
    ) -> Product {
        let repo = db.products();
        assert!(repo
            .create(&product(sku, stock, min_stock, category_id))
            .await
            .unwrap());
        repo.find_by_sku(sku).await.unwrap().unwrap()
    }
}
