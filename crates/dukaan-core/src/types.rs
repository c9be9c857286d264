//! # Domain Types
//!
//! Core domain types used throughout Dukaan.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │      User       │   │    Supplier     │   │     Product     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │        │
//! │  │  email (unique) │   │  name           │   │  product_code   │        │
//! │  │  shop_name      │   │  contact_info   │   │  sku            │        │
//! │  │  password_hash  │   └────────┬────────┘   │  stock_quantity │        │
//! │  └────────┬────────┘            │ 1:N        │  supplier_id ───┼──┐     │
//! │           │ 1:N                 └────────────┴─────────────────┘  │     │
//! │           ▼                                                       │     │
//! │  ┌─────────────────┐                                              │     │
//! │  │   Transaction   │  quantity, selling_price_cents (captured),   │     │
//! │  │  ─────────────  │  discount_cents                              │     │
//! │  │  user_id (FK)   │                                              │     │
//! │  │  product_id (FK)│◄─────────────────────────────────────────────┘     │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A product has:
//! - `id`: autoincrement row id - immutable, used for database relations
//! - `product_code`: SKU-derived slug - business key, deliberately NOT unique.
//!   Rows sharing a code are successive price/stock batches of the same SKU.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A registered shop account. One user = one shop; transactions belong to
/// the user that recorded them.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    /// Unique identifier (autoincrement).
    pub id: i64,

    /// Login email, unique across the system.
    pub email: String,

    /// Argon2 password hash. Never serialized.
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password_hash: String,

    /// Owner's display name.
    pub name: String,

    /// Name of the shop this account manages.
    pub shop_name: String,

    /// Free-form contact details (phone, address).
    pub contact_info: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier the shop purchases stock from. Owns zero or more products.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    pub id: i64,

    pub name: String,

    /// Free-form contact details.
    pub contact_info: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product batch.
///
/// ## Batches
/// Multiple rows may share a `product_code`; each row is one purchase batch
/// of the same SKU with its own purchase rate, selling price, and stock.
/// Available stock for a code is computed across all of its rows minus
/// everything already sold (see [`crate::stock`]).
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (autoincrement).
    pub id: i64,

    /// SKU-derived slug shared by all batches of the same SKU.
    /// Recomputed from the SKU on every write.
    pub product_code: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit as entered by the user.
    pub sku: String,

    /// Per-unit purchase cost in cents.
    pub purchase_rate_cents: i64,

    /// Per-unit selling price in cents.
    pub selling_price_cents: i64,

    /// Units remaining in this batch as recorded at intake.
    pub stock_quantity: i64,

    /// Supplier this batch was purchased from.
    pub supplier_id: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the purchase rate as a Money type.
    #[inline]
    pub fn purchase_rate(&self) -> Money {
        Money::from_cents(self.purchase_rate_cents)
    }

    /// Returns the selling price as a Money type.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A recorded sale.
///
/// ## Snapshot Pattern
/// `selling_price_cents` is captured from the latest batch at sale time,
/// so later catalog edits do not rewrite sales history.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    /// Unique identifier (autoincrement).
    pub id: i64,

    /// User (shop) that recorded the sale.
    pub user_id: i64,

    /// Product row the sale was entered against.
    pub product_id: i64,

    /// Units sold.
    pub quantity: i64,

    /// Per-unit price in cents, captured at sale time.
    pub selling_price_cents: i64,

    /// Discount in cents applied to the sale.
    pub discount_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the captured unit price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Total charged for this sale: unit price × quantity − discount.
    pub fn line_total(&self) -> Money {
        self.selling_price() * self.quantity - Money::from_cents(self.discount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_password_hash_never_serialized() {
        let user = User {
            id: 1,
            email: "owner@dukaan.example".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            name: "Asim".to_string(),
            shop_name: "Asim General Store".to_string(),
            contact_info: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("shopName"));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let product = Product {
            id: 7,
            product_code: "basmati-rice-5kg".to_string(),
            name: "Basmati Rice 5kg".to_string(),
            sku: "Basmati Rice 5kg".to_string(),
            purchase_rate_cents: 90000,
            selling_price_cents: 110000,
            stock_quantity: 12,
            supplier_id: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["productCode"], "basmati-rice-5kg");
        assert_eq!(json["sellingPriceCents"], 110000);
        assert!(json.get("product_code").is_none());
    }

    #[test]
    fn test_transaction_line_total() {
        let transaction = Transaction {
            id: 1,
            user_id: 1,
            product_id: 7,
            quantity: 3,
            selling_price_cents: 110000,
            discount_cents: 5000,
            created_at: Utc::now(),
        };

        assert_eq!(transaction.line_total(), Money::from_cents(3 * 110000 - 5000));
    }
}
