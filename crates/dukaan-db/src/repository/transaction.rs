//! # Transaction Repository
//!
//! Database operations for sales transactions.
//!
//! ## Sale Creation Inputs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              What a Sale Needs From This Repository                     │
//! │                                                                         │
//! │  POST /api/transactions { productId: 19, quantity: 4 }                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products().get(19)              → batch row + its product_code         │
//! │  total_stock_for_code(code)      → Σ stock across batches               │
//! │  total_sold_for_code(code)       → Σ quantity across prior sales        │
//! │  latest_batch_for_code(code)     → newest batch (price to capture)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dukaan_core::stock::check_stock(...) decides, then insert(...)         │
//! │                                                                         │
//! │  The reads and the insert are NOT wrapped in one DB transaction;        │
//! │  concurrent sales against the same code can oversell (documented gap).  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukaan_core::{Product, Transaction};

/// The slice of a user shown alongside a transaction (no email, no hash).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SaleParticipant {
    pub id: i64,
    pub name: String,
    pub shop_name: String,
}

/// A transaction joined with the user and product row it references.
#[derive(Debug, Clone)]
pub struct HydratedTransaction {
    pub transaction: Transaction,
    pub user: SaleParticipant,
    pub product: Product,
}

/// One line of the top-products ranking in a sales summary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: i64,
    pub sales_cents: i64,
}

/// Per-user sales aggregates.
#[derive(Debug, Clone)]
pub struct SalesSummary {
    /// Sum of the captured per-unit selling prices across the user's sales.
    pub total_sales_cents: i64,
    pub total_transactions: i64,
    /// Top 5 product rows by total quantity sold.
    pub top_products: Vec<TopProduct>,
}

const TRANSACTION_COLUMNS: &str =
    "id, user_id, product_id, quantity, selling_price_cents, discount_cents, created_at";

const PRODUCT_COLUMNS: &str = "id, product_code, name, sku, purchase_rate_cents, \
     selling_price_cents, stock_quantity, supplier_id, created_at, updated_at";

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Lists all transactions, newest first, with user and product attached.
    pub async fn list(&self) -> DbResult<Vec<HydratedTransaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(transactions).await
    }

    /// Gets one transaction with user and product attached.
    pub async fn get(&self, id: i64) -> DbResult<Option<HydratedTransaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(transaction) = transaction else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![transaction]).await?.into_iter().next())
    }

    /// Lists one user's transactions, newest first.
    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<HydratedTransaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE user_id = ?1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(transactions).await
    }

    /// Inserts a sale. The price must already be the latest batch price;
    /// the stock check happens before this call (see module docs).
    pub async fn insert(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
        selling_price_cents: i64,
        discount_cents: i64,
    ) -> DbResult<Transaction> {
        debug!(user_id, product_id, quantity, "Inserting transaction");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                user_id, product_id, quantity, selling_price_cents, discount_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(selling_price_cents)
        .bind(discount_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    // =========================================================================
    // Stock Inputs
    // =========================================================================

    /// Σ stock_quantity across every batch sharing a product code.
    pub async fn total_stock_for_code(&self, product_code: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(stock_quantity), 0) FROM products WHERE product_code = ?1",
        )
        .bind(product_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Σ quantity across every transaction whose product row shares the code.
    pub async fn total_sold_for_code(&self, product_code: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(t.quantity), 0)
            FROM transactions t
            INNER JOIN products p ON p.id = t.product_id
            WHERE p.product_code = ?1
            "#,
        )
        .bind(product_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// The most recently created batch for a code (id as tie-break).
    /// Its selling price is what a new sale captures.
    pub async fn latest_batch_for_code(&self, product_code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE product_code = ?1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        ))
        .bind(product_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    // =========================================================================
    // Summary
    // =========================================================================

    /// Per-user sales aggregates: captured-price total, transaction count,
    /// and the top 5 product rows by quantity sold.
    pub async fn summary_for_user(&self, user_id: i64) -> DbResult<SalesSummary> {
        let total_sales_cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(selling_price_cents), 0) FROM transactions WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let total_transactions: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT
                t.product_id AS product_id,
                p.name AS product_name,
                SUM(t.quantity) AS quantity_sold,
                SUM(t.selling_price_cents) AS sales_cents
            FROM transactions t
            INNER JOIN products p ON p.id = t.product_id
            WHERE t.user_id = ?1
            GROUP BY t.product_id, p.name
            ORDER BY quantity_sold DESC
            LIMIT 5
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(SalesSummary {
            total_sales_cents,
            total_transactions,
            top_products,
        })
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Attaches user and product rows to transactions in two extra queries.
    async fn hydrate(&self, transactions: Vec<Transaction>) -> DbResult<Vec<HydratedTransaction>> {
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        let users: Vec<SaleParticipant> =
            sqlx::query_as::<_, SaleParticipant>("SELECT id, name, shop_name FROM users")
                .fetch_all(&self.pool)
                .await?;
        let users: HashMap<i64, SaleParticipant> =
            users.into_iter().map(|u| (u.id, u)).collect();

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products"
        ))
        .fetch_all(&self.pool)
        .await?;
        let products: HashMap<i64, Product> =
            products.into_iter().map(|p| (p.id, p)).collect();

        transactions
            .into_iter()
            .map(|transaction| {
                let user = users.get(&transaction.user_id).cloned().ok_or_else(|| {
                    DbError::Internal(format!(
                        "transaction {} references missing user {}",
                        transaction.id, transaction.user_id
                    ))
                })?;
                let product = products
                    .get(&transaction.product_id)
                    .cloned()
                    .ok_or_else(|| {
                        DbError::Internal(format!(
                            "transaction {} references missing product {}",
                            transaction.id, transaction.product_id
                        ))
                    })?;
                Ok(HydratedTransaction {
                    transaction,
                    user,
                    product,
                })
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use crate::repository::supplier::SupplierChanges;
    use crate::repository::user::NewUser;
    use dukaan_core::stock::available_stock;

    struct Fixture {
        db: Database,
        user_id: i64,
        batch_a: Product,
        batch_b: Product,
    }

    /// Two batches of "Basmati Rice 5kg" with stock 5 and 3.
    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user = db
            .users()
            .insert(&NewUser {
                email: "owner@dukaan.example".to_string(),
                password_hash: "$argon2id$test".to_string(),
                name: "Asim".to_string(),
                shop_name: "Asim General Store".to_string(),
                contact_info: None,
            })
            .await
            .unwrap();

        let supplier = db
            .suppliers()
            .insert(&SupplierChanges {
                name: "Metro Wholesale".to_string(),
                contact_info: None,
            })
            .await
            .unwrap();

        let (batch_a, _) = db
            .products()
            .insert(&NewProduct {
                name: "Basmati Rice 5kg".to_string(),
                sku: "Basmati Rice 5kg".to_string(),
                purchase_rate_cents: 90000,
                selling_price_cents: 110000,
                stock_quantity: 5,
                supplier_id: supplier.id,
            })
            .await
            .unwrap();

        let (batch_b, _) = db
            .products()
            .insert(&NewProduct {
                name: "Basmati Rice 5kg".to_string(),
                sku: "basmati rice 5kg".to_string(),
                purchase_rate_cents: 95000,
                selling_price_cents: 120000,
                stock_quantity: 3,
                supplier_id: supplier.id,
            })
            .await
            .unwrap();

        Fixture {
            db,
            user_id: user.id,
            batch_a,
            batch_b,
        }
    }

    #[tokio::test]
    async fn test_stock_sums_across_batches_minus_sold() {
        let fx = fixture().await;
        let repo = fx.db.transactions();

        // One prior sale of 2 against the first batch
        repo.insert(fx.user_id, fx.batch_a.id, 2, 110000, 0)
            .await
            .unwrap();

        let total_stock = repo.total_stock_for_code("basmati-rice-5kg").await.unwrap();
        let total_sold = repo.total_sold_for_code("basmati-rice-5kg").await.unwrap();

        assert_eq!(total_stock, 8);
        assert_eq!(total_sold, 2);
        assert_eq!(available_stock(total_stock, total_sold), 6);
    }

    #[tokio::test]
    async fn test_latest_batch_wins_on_price() {
        let fx = fixture().await;

        let latest = fx
            .db
            .transactions()
            .latest_batch_for_code("basmati-rice-5kg")
            .await
            .unwrap()
            .unwrap();

        // batch_b was created last, so its selling price is captured
        assert_eq!(latest.id, fx.batch_b.id);
        assert_eq!(latest.selling_price_cents, 120000);
    }

    #[tokio::test]
    async fn test_sums_are_zero_for_unknown_code() {
        let fx = fixture().await;
        let repo = fx.db.transactions();

        assert_eq!(repo.total_stock_for_code("no-such-code").await.unwrap(), 0);
        assert_eq!(repo.total_sold_for_code("no-such-code").await.unwrap(), 0);
        assert!(repo
            .latest_batch_for_code("no-such-code")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_is_hydrated_and_newest_first() {
        let fx = fixture().await;
        let repo = fx.db.transactions();

        let first = repo
            .insert(fx.user_id, fx.batch_a.id, 1, 110000, 0)
            .await
            .unwrap();
        let second = repo
            .insert(fx.user_id, fx.batch_b.id, 2, 120000, 500)
            .await
            .unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].transaction.id, second.id);
        assert_eq!(all[1].transaction.id, first.id);
        assert_eq!(all[0].user.shop_name, "Asim General Store");
        assert_eq!(all[0].product.id, fx.batch_b.id);
    }

    #[tokio::test]
    async fn test_summary_for_user() {
        let fx = fixture().await;
        let repo = fx.db.transactions();

        repo.insert(fx.user_id, fx.batch_a.id, 1, 110000, 0)
            .await
            .unwrap();
        repo.insert(fx.user_id, fx.batch_a.id, 3, 110000, 0)
            .await
            .unwrap();
        repo.insert(fx.user_id, fx.batch_b.id, 2, 120000, 0)
            .await
            .unwrap();

        let summary = repo.summary_for_user(fx.user_id).await.unwrap();

        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_sales_cents, 110000 + 110000 + 120000);
        assert_eq!(summary.top_products.len(), 2);
        // batch_a sold 4 units total, ahead of batch_b's 2
        assert_eq!(summary.top_products[0].product_id, fx.batch_a.id);
        assert_eq!(summary.top_products[0].quantity_sold, 4);
    }

    #[tokio::test]
    async fn test_summary_for_user_with_no_sales() {
        let fx = fixture().await;

        let summary = fx.db.transactions().summary_for_user(fx.user_id).await.unwrap();

        assert_eq!(summary.total_sales_cents, 0);
        assert_eq!(summary.total_transactions, 0);
        assert!(summary.top_products.is_empty());
    }
}
