//! # Domain Types
//!
//! Core domain types used throughout Depot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│     Product     │   │      User       │       │
//! │  │  ─────────────  │ id│  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id, sku        │   │  id, username   │       │
//! │  │  name           │   │  price (Money)  │   │  password_hash  │       │
//! │  │  active         │   │  stock, min     │   │  role           │       │
//! │  └─────────────────┘   │  status         │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │ ProductStatus   │   │    UserRole     │                              │
//! │  │  Available      │   │  Manager        │                              │
//! │  │  LowStock       │   │  Picker         │                              │
//! │  │  OutOfStock     │   │  Receiver       │                              │
//! │  └─────────────────┘   │  Controller     │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Objects
//! Entities are plain values. Constructors check invariants, `with_*`
//! helpers return modified copies, and the database layer re-checks every
//! row it maps through [`Category::validated`] and friends. Relations are by
//! id only; a product never holds its category.
//!
//! An id of [`UNSAVED_ID`] marks an entity the store has not assigned yet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::status::{derive_status, needs_restock};
use crate::{EntityId, UNSAVED_ID};

// =============================================================================
// Product Status
// =============================================================================

/// Stock-level bucket of a product. See [`crate::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// More stock on hand than the reorder threshold.
    Available,
    /// At or below the reorder threshold, but not empty.
    LowStock,
    /// Nothing on hand.
    OutOfStock,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 3] = [
        ProductStatus::Available,
        ProductStatus::LowStock,
        ProductStatus::OutOfStock,
    ];

    /// Stored name of the status (`"LOW_STOCK"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "AVAILABLE",
            ProductStatus::LowStock => "LOW_STOCK",
            ProductStatus::OutOfStock => "OUT_OF_STOCK",
        }
    }

    /// Human-readable label.
    pub const fn display_name(&self) -> &'static str {
        match self {
            ProductStatus::Available => "Available",
            ProductStatus::LowStock => "Low stock",
            ProductStatus::OutOfStock => "Out of stock",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "Status".to_string(),
                allowed: ProductStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// User Role
// =============================================================================

/// Role tag of a warehouse user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Manager,
    Picker,
    Receiver,
    Controller,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Manager,
        UserRole::Picker,
        UserRole::Receiver,
        UserRole::Controller,
    ];

    /// Stored name of the role (`"MANAGER"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "MANAGER",
            UserRole::Picker => "PICKER",
            UserRole::Receiver => "RECEIVER",
            UserRole::Controller => "CONTROLLER",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            UserRole::Manager => "Manager",
            UserRole::Picker => "Picker",
            UserRole::Receiver => "Receiver",
            UserRole::Controller => "Controller",
        }
    }

    pub const fn icon(&self) -> &'static str {
        match self {
            UserRole::Manager => "👔",
            UserRole::Picker => "📦",
            UserRole::Receiver => "📥",
            UserRole::Controller => "📊",
        }
    }

    /// Icon and display name, e.g. `"📦 Picker"`.
    pub fn formatted(&self) -> String {
        format!("{} {}", self.icon(), self.display_name())
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "Role".to_string(),
                allowed: UserRole::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Deactivating a category is the only soft delete in
/// the system; inactive categories cannot receive new products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl Category {
    /// Creates a new, active, unsaved category.
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::Category;
    ///
    /// let category = Category::new("Electronics", "Devices").unwrap();
    /// assert!(category.active);
    /// assert!(Category::new("  ", "blank").is_err());
    /// ```
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> CoreResult<Self> {
        Category {
            id: UNSAVED_ID,
            name: name.into(),
            description: description.into(),
            active: true,
        }
        .validated()
    }

    /// Checks the invariants and hands the category back.
    pub fn validated(self) -> CoreResult<Self> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid("category", "name cannot be empty"));
        }
        Ok(self)
    }

    /// Copy with the given active flag.
    pub fn with_active(&self, active: bool) -> Self {
        Category {
            active,
            ..self.clone()
        }
    }

    /// Copy with the active flag inverted.
    pub fn toggled(&self) -> Self {
        self.with_active(!self.active)
    }

    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }
}

// =============================================================================
// Product
// =============================================================================

/// The inputs needed to register a new product.
///
/// Values are expected to have gone through [`crate::validation`] already;
/// [`Product::new`] only enforces the entity invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: i64,
    pub min_stock: i64,
    pub location: String,
    pub category_id: EntityId,
}

/// A stocked product.
///
/// `status` is stored alongside the stock figures it is derived from. Use
/// [`Product::with_stock`] or [`Product::with_derived_status`] to keep the
/// two consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    pub name: String,
    pub description: String,

    /// Unit price.
    pub price: Money,

    /// Quantity on hand.
    pub stock: i64,

    /// Quantity earmarked for pending allocations.
    pub reserved_stock: i64,

    /// Reorder threshold.
    pub min_stock: i64,

    /// Shelf location, e.g. `A-12-3`.
    pub location: String,

    pub status: ProductStatus,
    pub category_id: EntityId,

    /// Written by the store on every insert and update.
    pub last_update: DateTime<Utc>,
}

impl Product {
    /// Creates an unsaved product with no reserved stock and a derived status.
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::{Money, Product, ProductDraft, ProductStatus};
    ///
    /// let product = Product::new(ProductDraft {
    ///     sku: "SKU-001".into(),
    ///     name: "Laptop".into(),
    ///     description: "Gaming laptop".into(),
    ///     price: Money::from_cents(129_999),
    ///     stock: 3,
    ///     min_stock: 5,
    ///     location: "A-01".into(),
    ///     category_id: 1,
    /// })
    /// .unwrap();
    /// assert_eq!(product.status, ProductStatus::LowStock);
    /// ```
    pub fn new(draft: ProductDraft) -> CoreResult<Self> {
        let status = derive_status(draft.stock, draft.min_stock);
        Product {
            id: UNSAVED_ID,
            sku: draft.sku,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            reserved_stock: 0,
            min_stock: draft.min_stock,
            location: draft.location,
            status,
            category_id: draft.category_id,
            last_update: Utc::now(),
        }
        .validated()
    }

    /// Checks the invariants and hands the product back.
    pub fn validated(self) -> CoreResult<Self> {
        let reason = if self.sku.trim().is_empty() {
            "SKU cannot be empty"
        } else if self.name.trim().is_empty() {
            "name cannot be empty"
        } else if self.price.is_negative() {
            "price cannot be negative"
        } else if self.stock < 0 {
            "stock cannot be negative"
        } else if self.reserved_stock < 0 {
            "reserved stock cannot be negative"
        } else if self.min_stock < 0 {
            "minimum stock cannot be negative"
        } else {
            return Ok(self);
        };
        Err(CoreError::invalid("product", reason))
    }

    /// True when stock is at or below the reorder threshold.
    #[inline]
    pub fn needs_restock(&self) -> bool {
        needs_restock(self.stock, self.min_stock)
    }

    /// Stock not earmarked for allocations.
    ///
    /// Not clamped: a negative value means more stock is reserved than is on
    /// hand.
    #[inline]
    pub fn available_stock(&self) -> i64 {
        self.stock - self.reserved_stock
    }

    /// The status these stock figures should carry.
    #[inline]
    pub fn derived_status(&self) -> ProductStatus {
        derive_status(self.stock, self.min_stock)
    }

    /// Copy whose stored status matches its stock figures.
    pub fn with_derived_status(&self) -> Self {
        Product {
            status: self.derived_status(),
            ..self.clone()
        }
    }

    /// Copy with a new on-hand quantity and the matching status.
    pub fn with_stock(&self, stock: i64) -> CoreResult<Self> {
        Product {
            stock,
            status: derive_status(stock, self.min_stock),
            ..self.clone()
        }
        .validated()
    }

    /// Stock value at the current unit price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price * self.stock
    }

    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }
}

// =============================================================================
// User
// =============================================================================

/// A warehouse operator account.
///
/// Only the hash of the password is ever stored here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    /// Never serialized. Deserialized snapshots carry an empty hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    /// Written by the store on insert.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates an unsaved user from an already hashed password.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: UserRole,
    ) -> CoreResult<Self> {
        User {
            id: UNSAVED_ID,
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            full_name: full_name.into(),
            role,
            created_at: Utc::now(),
        }
        .validated()
    }

    /// Checks the invariants and hands the user back.
    pub fn validated(self) -> CoreResult<Self> {
        let reason = if self.username.trim().is_empty() {
            "username cannot be empty"
        } else if self.password_hash.trim().is_empty() {
            "password hash is missing"
        } else if !self.email.contains('@') {
            "email must contain '@'"
        } else if self.full_name.trim().is_empty() {
            "full name cannot be empty"
        } else {
            return Ok(self);
        };
        Err(CoreError::invalid("user", reason))
    }

    /// Copy carrying a different password hash.
    pub fn with_password_hash(&self, password_hash: impl Into<String>) -> CoreResult<Self> {
        User {
            password_hash: password_hash.into(),
            ..self.clone()
        }
        .validated()
    }

    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }
}

// Keeps the hash out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
