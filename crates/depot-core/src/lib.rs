//! # depot-core: Pure Domain Logic for Depot
//!
//! This crate is the **heart** of Depot, a warehouse inventory manager. It
//! contains the entity model, the validation pipeline and the stock-status
//! engine as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Depot Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (menus, seed binary, ...)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain function calls                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  depot-service (facade)                         │   │
//! │  │    CategoryService, ProductService, UserService, Dashboard      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ depot-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  status   │  │   money   │  │ validation│  │   │
//! │  │   │  Product  │  │ derive_   │  │   Money   │  │   rules   │  │   │
//! │  │   │  Category │  │  status   │  │  (cents)  │  │  checks   │  │   │
//! │  │   │   User    │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    depot-db (Database Layer)                    │   │
//! │  │              SQLite queries, schema, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Category, Product, User) and their enums
//! - [`status`] - Stock status derivation
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation pipeline
//!
//! ## Example Usage
//!
//! ```rust
//! use depot_core::status::derive_status;
//! use depot_core::validation::validate_sku;
//! use depot_core::ProductStatus;
//!
//! assert_eq!(validate_sku("prod-001").unwrap(), "PROD-001");
//! assert_eq!(derive_status(3, 5), ProductStatus::LowStock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use status::derive_status;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Identifier type shared by every entity.
///
/// SQLite `INTEGER PRIMARY KEY` columns map to `i64`.
pub type EntityId = i64;

/// Id carried by entities that have not been persisted yet.
///
/// The store assigns the real id on insert.
pub const UNSAVED_ID: EntityId = 0;

/// Largest accepted product price in cents (999,999.99).
pub const MAX_PRICE_CENTS: i64 = 99_999_999;

/// Largest accepted stock quantity for a single product.
pub const MAX_STOCK: i64 = 1_000_000;
