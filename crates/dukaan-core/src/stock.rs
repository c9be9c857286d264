//! # Stock Arithmetic
//!
//! Pure stock computations over product batches and prior sales.
//!
//! ## Available Stock
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │            How Available Stock Is Computed for a Code                   │
//! │                                                                         │
//! │  products (product_code = "basmati-rice-5kg")                           │
//! │  ├── batch #12  stock_quantity = 5                                      │
//! │  └── batch #19  stock_quantity = 3     Σ stock = 8                      │
//! │                                                                         │
//! │  transactions (product row in {#12, #19})                               │
//! │  └── sale #40   quantity = 2           Σ sold  = 2                      │
//! │                                                                         │
//! │  available = 8 − 2 = 6                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is computed at read time on each sale attempt, with no transaction
//! isolation: two concurrent sales against the same code can both observe
//! the same availability and oversell. Known, documented gap.

use crate::error::{CoreError, CoreResult};

/// Computes available stock from summed batch stock and summed sold quantity.
///
/// ## Example
/// ```rust
/// use dukaan_core::stock::available_stock;
///
/// // Two batches of 5 and 3, one prior sale of 2
/// assert_eq!(available_stock(5 + 3, 2), 6);
/// ```
#[inline]
pub const fn available_stock(total_stock: i64, total_sold: i64) -> i64 {
    total_stock - total_sold
}

/// Checks that a requested quantity fits within the available stock.
///
/// ## Arguments
/// * `product_code` - Code of the batches being sold (for the error message)
/// * `total_stock` - Σ stock_quantity across batches sharing the code
/// * `total_sold` - Σ quantity across prior transactions for the code
/// * `requested` - Quantity of the sale being attempted
///
/// ## Returns
/// * `Ok(available)` - Enough stock; returns the availability that was checked
/// * `Err(CoreError::InsufficientStock)` - Requested more than available
pub fn check_stock(
    product_code: &str,
    total_stock: i64,
    total_sold: i64,
    requested: i64,
) -> CoreResult<i64> {
    let available = available_stock(total_stock, total_sold);

    if requested > available {
        return Err(CoreError::InsufficientStock {
            product_code: product_code.to_string(),
            available,
            requested,
        });
    }

    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_stock_sums_batches_minus_sold() {
        // Batches of 5 and 3 with one prior sale of 2 leave 6 available.
        assert_eq!(available_stock(5 + 3, 2), 6);
    }

    #[test]
    fn test_available_stock_can_go_negative() {
        // An oversold code reports negative availability rather than clamping.
        assert_eq!(available_stock(4, 6), -2);
    }

    #[test]
    fn test_check_stock_allows_exact_fit() {
        assert_eq!(check_stock("sugar-1kg", 8, 2, 6).unwrap(), 6);
    }

    #[test]
    fn test_check_stock_rejects_over_request() {
        let err = check_stock("sugar-1kg", 8, 2, 7).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 6);
                assert_eq!(requested, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
