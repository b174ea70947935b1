//! # Product Operations
//!
//! Validation, category rules and stock changes for products.
//!
//! ## Creating a Product
//! ```text
//! NewProduct (raw input)
//!     │
//!     ├── validate every field ─────────────► ValidationError
//!     ├── category exists? ─────────────────► "Category does not exist"
//!     ├── category active? ─────────────────► "Category is inactive"
//!     ├── Product::new (status derived)
//!     └── store.create ── duplicate SKU ────► "SKU 'X' already exists"
//! ```
//! Nothing is written unless every check passes.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use depot_core::status::{derive_status, needs_restock};
use depot_core::validation::{
    validate_description, validate_location, validate_min_stock, validate_price,
    validate_product_name, validate_sku, validate_stock,
};
use depot_core::{EntityId, Product, ProductDraft, ProductStatus, ValidationError};
use depot_db::{CategoryStore, DbError, ProductStore};

use crate::error::{ensure_persisted, ServiceError, ServiceResult};

/// Raw input for a new product, as typed by an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub min_stock: i64,
    pub location: String,
    pub category_id: EntityId,
}

/// Outcome of a stock change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub product_id: EntityId,
    pub sku: String,
    pub previous_stock: i64,
    pub new_stock: i64,
    pub min_stock: i64,
    pub status: ProductStatus,
    /// Set when the new stock is at or below the reorder threshold.
    pub low_stock_alert: bool,
}

impl StockUpdate {
    fn new(product: &Product, new_stock: i64) -> Self {
        StockUpdate {
            product_id: product.id,
            sku: product.sku.clone(),
            previous_stock: product.stock,
            new_stock,
            min_stock: product.min_stock,
            status: derive_status(new_stock, product.min_stock),
            low_stock_alert: needs_restock(new_stock, product.min_stock),
        }
    }
}

/// Business operations on products.
#[derive(Debug, Clone)]
pub struct ProductService<P, C> {
    products: P,
    categories: C,
}

impl<P: ProductStore, C: CategoryStore> ProductService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        ProductService {
            products,
            categories,
        }
    }

    /// All products, ordered by name.
    pub async fn find_all(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.find_all().await?)
    }

    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Option<Product>> {
        Ok(self.products.find_by_id(id).await?)
    }

    /// Looks a product up by SKU, case-insensitively. Blank input finds
    /// nothing without touching the store.
    pub async fn find_by_sku(&self, sku: &str) -> ServiceResult<Option<Product>> {
        let sku = sku.trim();
        if sku.is_empty() {
            return Ok(None);
        }
        Ok(self.products.find_by_sku(&sku.to_uppercase()).await?)
    }

    pub async fn find_by_category(&self, category_id: EntityId) -> ServiceResult<Vec<Product>> {
        Ok(self.products.find_by_category(category_id).await?)
    }

    /// Products at or below their reorder threshold, lowest stock first.
    pub async fn find_low_stock(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.find_low_stock().await?)
    }

    /// Number of stored products, without loading them.
    pub async fn count(&self) -> ServiceResult<i64> {
        Ok(self.products.count().await?)
    }

    /// Validates `input`, checks its category and stores the product.
    ///
    /// Returns the stored product with its assigned id.
    pub async fn create(&self, input: NewProduct) -> ServiceResult<Product> {
        let draft = ProductDraft {
            sku: validate_sku(&input.sku)?,
            name: validate_product_name(&input.name)?,
            description: validate_description(&input.description)?,
            price: validate_price(input.price)?,
            stock: validate_stock(input.stock)?,
            min_stock: validate_min_stock(input.min_stock)?,
            location: validate_location(&input.location)?,
            category_id: input.category_id,
        };

        self.ensure_category_accepts_products(draft.category_id).await?;

        let product = Product::new(draft)?;
        let inserted = self
            .products
            .create(&product)
            .await
            .map_err(|e| ServiceError::duplicate_or_storage(e, "SKU", &product.sku))?;
        if !inserted {
            return Err(DbError::QueryFailed(format!(
                "product '{}' was not inserted",
                product.sku
            ))
            .into());
        }

        let created = self
            .products
            .find_by_sku(&product.sku)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &product.sku))?;

        info!(id = created.id, sku = %created.sku, status = %created.status, "Product created");
        Ok(created)
    }

    /// Replaces the stored product after re-validating it.
    ///
    /// The status is re-derived from the stock figures, so a stale status on
    /// the input is never persisted. The category must exist but may be
    /// inactive. `false` if the product no longer exists.
    pub async fn update(&self, product: &Product) -> ServiceResult<bool> {
        ensure_persisted(product.id, "Product")?;

        validate_price(product.price.as_decimal())?;
        let normalized = Product {
            sku: validate_sku(&product.sku)?,
            name: validate_product_name(&product.name)?,
            description: validate_description(&product.description)?,
            stock: validate_stock(product.stock)?,
            min_stock: validate_min_stock(product.min_stock)?,
            location: validate_location(&product.location)?,
            ..product.clone()
        }
        .with_derived_status()
        .validated()?;

        if !self.categories.exists(normalized.category_id).await? {
            return Err(ValidationError::UnknownReference {
                entity: "Category".to_string(),
            }
            .into());
        }

        Ok(self
            .products
            .update(&normalized)
            .await
            .map_err(|e| ServiceError::duplicate_or_storage(e, "SKU", &normalized.sku))?)
    }

    /// Sets the on-hand stock. The store recomputes the status in the same
    /// write.
    ///
    /// Returns `None` if the product does not exist; nothing is written then.
    /// Concurrent updates race, and the last one wins.
    pub async fn update_stock(
        &self,
        id: EntityId,
        new_stock: i64,
    ) -> ServiceResult<Option<StockUpdate>> {
        let new_stock = validate_stock(new_stock)?;

        let Some(product) = self.products.find_by_id(id).await? else {
            warn!(id, "Cannot update stock of unknown product");
            return Ok(None);
        };

        if !self.products.update_stock(id, new_stock).await? {
            return Ok(None);
        }

        Ok(Some(self.report(&product, new_stock)))
    }

    /// Compare-and-swap variant of [`ProductService::update_stock`].
    ///
    /// Writes only if the stored stock still equals `expected`. Returns
    /// `None` if the product is missing or its stock has moved on.
    pub async fn replace_stock(
        &self,
        id: EntityId,
        expected: i64,
        new_stock: i64,
    ) -> ServiceResult<Option<StockUpdate>> {
        let new_stock = validate_stock(new_stock)?;

        let Some(product) = self.products.find_by_id(id).await? else {
            return Ok(None);
        };

        if !self.products.update_stock_if(id, expected, new_stock).await? {
            warn!(id, expected, "Stock changed concurrently, not replaced");
            return Ok(None);
        }

        let previous = Product {
            stock: expected,
            ..product
        };
        Ok(Some(self.report(&previous, new_stock)))
    }

    pub async fn delete(&self, id: EntityId) -> ServiceResult<bool> {
        let deleted = self.products.delete(id).await?;
        if deleted {
            info!(id, "Product deleted");
        }
        Ok(deleted)
    }

    async fn ensure_category_accepts_products(&self, category_id: EntityId) -> ServiceResult<()> {
        let category = self.categories.find_by_id(category_id).await?;
        match category {
            None => Err(ValidationError::UnknownReference {
                entity: "Category".to_string(),
            }
            .into()),
            Some(c) if !c.active => Err(ValidationError::InactiveReference {
                entity: "Category".to_string(),
            }
            .into()),
            Some(_) => Ok(()),
        }
    }

    fn report(&self, product: &Product, new_stock: i64) -> StockUpdate {
        let update = StockUpdate::new(product, new_stock);
        if update.low_stock_alert {
            warn!(
                sku = %update.sku,
                stock = update.new_stock,
                min_stock = update.min_stock,
                "Low stock"
            );
        } else {
            info!(sku = %update.sku, stock = update.new_stock, "Stock updated");
        }
        update
    }
}
