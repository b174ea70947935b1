//! Inventory statistics for the landing screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use depot_core::{Money, ProductStatus};
use depot_db::{CategoryStore, ProductStore, UserStore};

use crate::error::ServiceResult;

/// Snapshot of the whole inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total_products: i64,
    pub available: i64,
    pub out_of_stock: i64,
    /// Products at or below their reorder threshold, out-of-stock included.
    pub low_stock: i64,
    /// Sum of price × on-hand stock.
    pub inventory_value: Money,
    pub total_categories: i64,
    pub active_categories: i64,
    pub total_users: i64,
}

#[derive(Debug, Clone)]
pub struct DashboardService<P, C, U> {
    products: P,
    categories: C,
    users: U,
}

impl<P: ProductStore, C: CategoryStore, U: UserStore> DashboardService<P, C, U> {
    pub fn new(products: P, categories: C, users: U) -> Self {
        DashboardService {
            products,
            categories,
            users,
        }
    }

    pub async fn summary(&self) -> ServiceResult<InventorySummary> {
        let products = self.products.find_all().await?;
        let categories = self.categories.find_all().await?;
        let users = self.users.find_all().await?;

        let count = |status: ProductStatus| {
            products.iter().filter(|p| p.status == status).count() as i64
        };

        let summary = InventorySummary {
            total_products: products.len() as i64,
            available: count(ProductStatus::Available),
            out_of_stock: count(ProductStatus::OutOfStock),
            low_stock: products.iter().filter(|p| p.needs_restock()).count() as i64,
            inventory_value: products.iter().map(|p| p.stock_value()).sum(),
            total_categories: categories.len() as i64,
            active_categories: categories.iter().filter(|c| c.active).count() as i64,
            total_users: users.len() as i64,
        };

        debug!(?summary, "Inventory summary computed");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCategories, MockProducts, MockUsers};
    use chrono::Utc;
    use depot_core::{derive_status, Category, Product};
    use depot_db::DbError;

    fn product(id: i64, stock: i64, min_stock: i64, cents: i64) -> Product {
        Product {
            id,
            sku: format!("SKU-{id:03}"),
            name: format!("Product {id}"),
            description: String::new(),
            price: Money::from_cents(cents),
            stock,
            reserved_stock: 0,
            min_stock,
            location: String::new(),
            status: derive_status(stock, min_stock),
            category_id: 1,
            last_update: Utc::now(),
        }
    }

    fn category(id: i64, active: bool) -> Category {
        Category {
            id,
            name: format!("Category {id}"),
            description: String::new(),
            active,
        }
    }

    #[tokio::test]
    async fn test_summary_counts_and_value() {
        let mut products = MockProducts::new();
        products.expect_find_all().returning(|| {
            Ok(vec![
                product(1, 10, 5, 1_000), // available, 100.00
                product(2, 3, 5, 250),    // low, 7.50
                product(3, 0, 5, 9_999),  // out, 0
            ])
        });
        let mut categories = MockCategories::new();
        categories
            .expect_find_all()
            .returning(|| Ok(vec![category(1, true), category(2, false)]));
        let mut users = MockUsers::new();
        users.expect_find_all().returning(|| Ok(Vec::new()));

        let summary = DashboardService::new(products, categories, users)
            .summary()
            .await
            .unwrap();

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.out_of_stock, 1);
        assert_eq!(summary.low_stock, 2);
        assert_eq!(summary.inventory_value, Money::from_cents(107_50));
        assert_eq!(summary.total_categories, 2);
        assert_eq!(summary.active_categories, 1);
        assert_eq!(summary.total_users, 0);
    }

    #[tokio::test]
    async fn test_summary_fails_when_store_fails() {
        let mut products = MockProducts::new();
        products
            .expect_find_all()
            .returning(|| Err(DbError::ConnectionFailed("gone".to_string())));

        let service =
            DashboardService::new(products, MockCategories::new(), MockUsers::new());
        assert!(service.summary().await.is_err());
    }
}
