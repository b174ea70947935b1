//! # Stock Status Derivation
//!
//! Maps a product's stock figures to its [`ProductStatus`] bucket.
//!
//! ```text
//! stock            0 ──────── min_stock ─────────────────►
//!                  │              │
//!   OUT_OF_STOCK ◄─┘  LOW_STOCK   │   AVAILABLE
//!                  (0, min_stock] │   (min_stock, ∞)
//! ```
//!
//! The same thresholds are evaluated inside the database when stock is
//! updated atomically (see `depot-db`'s product repository), so the two must
//! stay in lockstep.

use crate::types::ProductStatus;

/// Derives the status bucket for the given stock level.
///
/// ## Example
/// ```rust
/// use depot_core::{derive_status, ProductStatus};
///
/// assert_eq!(derive_status(0, 5), ProductStatus::OutOfStock);
/// assert_eq!(derive_status(5, 5), ProductStatus::LowStock);
/// assert_eq!(derive_status(6, 5), ProductStatus::Available);
/// ```
pub fn derive_status(stock: i64, min_stock: i64) -> ProductStatus {
    if stock == 0 {
        ProductStatus::OutOfStock
    } else if stock <= min_stock {
        ProductStatus::LowStock
    } else {
        ProductStatus::Available
    }
}

/// True when the product has fallen to (or below) its reorder threshold.
#[inline]
pub fn needs_restock(stock: i64, min_stock: i64) -> bool {
    stock <= min_stock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stock_is_out_of_stock() {
        assert_eq!(derive_status(0, 0), ProductStatus::OutOfStock);
        assert_eq!(derive_status(0, 10), ProductStatus::OutOfStock);
    }

    #[test]
    fn test_stock_at_or_below_minimum_is_low() {
        assert_eq!(derive_status(1, 10), ProductStatus::LowStock);
        assert_eq!(derive_status(10, 10), ProductStatus::LowStock);
    }

    #[test]
    fn test_stock_above_minimum_is_available() {
        assert_eq!(derive_status(11, 10), ProductStatus::Available);
        assert_eq!(derive_status(1, 0), ProductStatus::Available);
    }

    #[test]
    fn test_buckets_partition_the_domain() {
        for min_stock in 0..20 {
            for stock in 0..40 {
                let status = derive_status(stock, min_stock);
                let expected = if stock == 0 {
                    ProductStatus::OutOfStock
                } else if stock <= min_stock {
                    ProductStatus::LowStock
                } else {
                    ProductStatus::Available
                };
                assert_eq!(status, expected, "stock={stock} min={min_stock}");
            }
        }
    }

    #[test]
    fn test_needs_restock_includes_threshold() {
        assert!(needs_restock(5, 5));
        assert!(needs_restock(0, 0));
        assert!(!needs_restock(6, 5));
    }
}
