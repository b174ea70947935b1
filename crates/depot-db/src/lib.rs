//! # depot-db: Database Layer for Depot
//!
//! This crate provides SQLite persistence for Depot's categories, products
//! and users, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Depot Data Flow                                │
//! │                                                                         │
//! │  depot-service (ProductService::update_stock)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     depot-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │(connection.rs)│    │  (category,   │    │  (embedded)  │  │   │
//! │  │   │               │    │ product, user)│    │              │  │   │
//! │  │   │ Connection    │◄───│ SqlExecutor   │    │ 0001_initial │  │   │
//! │  │   │ Factory       │    │ MapRow        │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (one file)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`connection`] - Configuration and the per-call connection factory
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The generic repository contract and its implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use depot_db::{Database, DbConfig, ProductStore};
//!
//! let db = Database::new(DbConfig::new("depot.db")).await?;
//! let low = db.products().find_low_stock().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod connection;
pub mod error;
pub mod migrations;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use connection::{ConnectionFactory, Database, DbConfig, ScratchDatabase, SqliteConnector};
pub use error::{DbError, DbResult};

// Repository re-exports for convenience
pub use repository::{
    CategoryRepository, CategoryStore, MapRow, ProductRepository, ProductStore, Repository,
    SqlExecutor, UserRepository, UserStore,
};
