//! # depot-service: Service Facade for Depot
//!
//! The layer callers talk to. Every operation validates its input with
//! `depot-core`, enforces cross-entity rules and only then reaches the
//! repositories in `depot-db`.
//!
//! ## Call Flow
//! ```text
//! caller ──► ProductService::create(NewProduct)
//!                 │
//!                 ├─ depot_core::validation   (field rules)
//!                 ├─ CategoryStore::find_by_id (category exists, active)
//!                 └─ ProductStore::create      (one statement, auto-commit)
//! ```
//!
//! ## Modules
//!
//! - [`category`], [`product`], [`user`] - Per-entity services
//! - [`dashboard`] - Inventory statistics
//! - [`password`] - Argon2 hashing
//! - [`config`] - Environment configuration
//! - [`error`] - [`ServiceError`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depot_service::{AppConfig, Depot};
//!
//! let depot = Depot::open(&AppConfig::load()?).await?;
//! for product in depot.products.find_low_stock().await? {
//!     println!("{} {}", product.sku, product.stock);
//! }
//! ```

pub mod category;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod password;
pub mod product;
pub mod user;

pub use category::CategoryService;
pub use config::{AppConfig, ConfigError};
pub use dashboard::{DashboardService, InventorySummary};
pub use error::{ServiceError, ServiceResult};
pub use password::{HashingConfig, PasswordHasher};
pub use product::{NewProduct, ProductService, StockUpdate};
pub use user::{NewUser, UserService};

use depot_db::{CategoryRepository, Database, ProductRepository, UserRepository};
use tracing::info;

/// Every service wired to one SQLite database.
#[derive(Debug, Clone)]
pub struct Depot {
    pub categories: CategoryService<CategoryRepository>,
    pub products: ProductService<ProductRepository, CategoryRepository>,
    pub users: UserService<UserRepository>,
    pub dashboard: DashboardService<ProductRepository, CategoryRepository, UserRepository>,
    database: Database,
}

impl Depot {
    /// Opens (and by default migrates) the configured database.
    pub async fn open(config: &AppConfig) -> ServiceResult<Self> {
        let hasher = PasswordHasher::new(config.hashing)?;
        let database = Database::new(config.db_config()).await?;
        info!(path = %config.database_path.display(), "Depot ready");
        Ok(Depot::with_database(database, hasher))
    }

    pub fn with_database(database: Database, hasher: PasswordHasher) -> Self {
        Depot {
            categories: CategoryService::new(database.categories()),
            products: ProductService::new(database.products(), database.categories()),
            users: UserService::new(database.users(), hasher),
            dashboard: DashboardService::new(
                database.products(),
                database.categories(),
                database.users(),
            ),
            database,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Repository doubles for service tests.

    use async_trait::async_trait;
    use mockall::mock;

    use depot_core::{Category, EntityId, Product, User, UserRole};
    use depot_db::{CategoryStore, DbResult, ProductStore, Repository, UserStore};

    mock! {
        pub Categories {}

        #[async_trait]
        impl Repository<Category, EntityId> for Categories {
            async fn create(&self, entity: &Category) -> DbResult<bool>;
            async fn update(&self, entity: &Category) -> DbResult<bool>;
            async fn delete(&self, id: EntityId) -> DbResult<bool>;
            async fn find_by_id(&self, id: EntityId) -> DbResult<Option<Category>>;
            async fn find_all(&self) -> DbResult<Vec<Category>>;
        }

        #[async_trait]
        impl CategoryStore for Categories {
            async fn find_all_active(&self) -> DbResult<Vec<Category>>;
            async fn find_by_name(&self, name: &str) -> DbResult<Option<Category>>;
            async fn exists(&self, id: EntityId) -> DbResult<bool>;
        }
    }

    mock! {
        pub Products {}

        #[async_trait]
        impl Repository<Product, EntityId> for Products {
            async fn create(&self, entity: &Product) -> DbResult<bool>;
            async fn update(&self, entity: &Product) -> DbResult<bool>;
            async fn delete(&self, id: EntityId) -> DbResult<bool>;
            async fn find_by_id(&self, id: EntityId) -> DbResult<Option<Product>>;
            async fn find_all(&self) -> DbResult<Vec<Product>>;
        }

        #[async_trait]
        impl ProductStore for Products {
            async fn find_by_sku(&self, sku: &str) -> DbResult<Option<Product>>;
            async fn find_by_category(&self, category_id: EntityId) -> DbResult<Vec<Product>>;
            async fn find_low_stock(&self) -> DbResult<Vec<Product>>;
            async fn update_stock(&self, id: EntityId, new_stock: i64) -> DbResult<bool>;
            async fn update_stock_if(
                &self,
                id: EntityId,
                expected: i64,
                new_stock: i64,
            ) -> DbResult<bool>;
            async fn count(&self) -> DbResult<i64>;
        }
    }

    mock! {
        pub Users {}

        #[async_trait]
        impl Repository<User, EntityId> for Users {
            async fn create(&self, entity: &User) -> DbResult<bool>;
            async fn update(&self, entity: &User) -> DbResult<bool>;
            async fn delete(&self, id: EntityId) -> DbResult<bool>;
            async fn find_by_id(&self, id: EntityId) -> DbResult<Option<User>>;
            async fn find_all(&self) -> DbResult<Vec<User>>;
        }

        #[async_trait]
        impl UserStore for Users {
            async fn find_by_username(&self, username: &str) -> DbResult<Option<User>>;
            async fn find_by_role(&self, role: UserRole) -> DbResult<Vec<User>>;
        }
    }
}
