//! # Product Repository
//!
//! Database operations for product batches.
//!
//! ## Key Operations
//! - CRUD on batch rows, always returned with their supplier
//! - Lookup of every batch sharing a product code, cheapest purchase first
//! - Absolute stock adjustment
//!
//! ## Product Code Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The product_code column is ALWAYS derived from the sku column.         │
//! │                                                                         │
//! │  insert(sku: "Basmati Rice 5kg")  → product_code = "basmati-rice-5kg"   │
//! │  update(sku: "Basmati Rice 10kg") → product_code = "basmati-rice-10kg"  │
//! │                                                                         │
//! │  Both writes go through derive_product_code, so a batch can never       │
//! │  carry a code that disagrees with its SKU.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukaan_core::{derive_product_code, Product, Supplier};

/// Fields accepted when creating or fully updating a product batch.
/// The product code is derived from `sku`, never passed in.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub purchase_rate_cents: i64,
    pub selling_price_cents: i64,
    pub stock_quantity: i64,
    pub supplier_id: i64,
}

const PRODUCT_COLUMNS: &str = "id, product_code, name, sku, purchase_rate_cents, \
     selling_price_cents, stock_quantity, supplier_id, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all product batches with their suppliers.
    pub async fn list(&self) -> DbResult<Vec<(Product, Supplier)>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.attach_suppliers(products).await
    }

    /// Gets one product batch with its supplier.
    ///
    /// ## Returns
    /// * `Ok(Some((Product, Supplier)))` - Batch found
    /// * `Ok(None)` - Batch not found
    pub async fn get(&self, id: i64) -> DbResult<Option<(Product, Supplier)>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let supplier = self.supplier_of(&product).await?;
        Ok(Some((product, supplier)))
    }

    /// Lists every batch sharing a product code, with suppliers.
    ///
    /// Ordered by purchase rate ascending: the cheapest intake first, which
    /// is how the catalog screens present price history.
    pub async fn list_by_code(&self, product_code: &str) -> DbResult<Vec<(Product, Supplier)>> {
        debug!(product_code = %product_code, "Listing batches by code");

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE product_code = ?1 \
             ORDER BY purchase_rate_cents ASC, id ASC"
        ))
        .bind(product_code)
        .fetch_all(&self.pool)
        .await?;

        self.attach_suppliers(products).await
    }

    /// Inserts a new product batch.
    ///
    /// The product code is derived from the submitted SKU.
    ///
    /// ## Returns
    /// * `Ok((Product, Supplier))` - Inserted batch with its supplier
    /// * `Err(DbError::ForeignKeyViolation)` - supplier_id doesn't exist
    pub async fn insert(&self, new: &NewProduct) -> DbResult<(Product, Supplier)> {
        let product_code = derive_product_code(&new.sku);
        debug!(sku = %new.sku, product_code = %product_code, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                product_code, name, sku, purchase_rate_cents, selling_price_cents,
                stock_quantity, supplier_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product_code)
        .bind(&new.name)
        .bind(&new.sku)
        .bind(new.purchase_rate_cents)
        .bind(new.selling_price_cents)
        .bind(new.stock_quantity)
        .bind(new.supplier_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        self.get(id)
            .await?
            .ok_or_else(|| DbError::Internal("inserted product row vanished".to_string()))
    }

    /// Fully updates a product batch.
    ///
    /// The product code is recomputed from the submitted SKU on every write.
    ///
    /// ## Returns
    /// * `Ok((Product, Supplier))` - Updated batch
    /// * `Err(DbError::NotFound)` - Batch doesn't exist
    pub async fn update(&self, id: i64, changes: &NewProduct) -> DbResult<(Product, Supplier)> {
        let product_code = derive_product_code(&changes.sku);
        debug!(id = %id, product_code = %product_code, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                product_code = ?2,
                name = ?3,
                sku = ?4,
                purchase_rate_cents = ?5,
                selling_price_cents = ?6,
                stock_quantity = ?7,
                supplier_id = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product_code)
        .bind(&changes.name)
        .bind(&changes.sku)
        .bind(changes.purchase_rate_cents)
        .bind(changes.selling_price_cents)
        .bind(changes.stock_quantity)
        .bind(changes.supplier_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::Internal("updated product row vanished".to_string()))
    }

    /// Sets the recorded stock of a batch to an absolute value.
    ///
    /// ## Returns
    /// * `Ok((Product, Supplier))` - Updated batch
    /// * `Err(DbError::NotFound)` - Batch doesn't exist
    pub async fn set_stock(&self, id: i64, stock_quantity: i64) -> DbResult<(Product, Supplier)> {
        debug!(id = %id, stock_quantity = %stock_quantity, "Setting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(stock_quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id)
            .await?
            .ok_or_else(|| DbError::Internal("updated product row vanished".to_string()))
    }

    /// Deletes a product batch.
    ///
    /// ## Returns
    /// * `Ok(())` - Deleted
    /// * `Err(DbError::NotFound)` - Batch doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - Transactions still reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Loads the supplier a batch belongs to. The FK guarantees it exists.
    async fn supplier_of(&self, product: &Product) -> DbResult<Supplier> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(product.supplier_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Pairs each product with its supplier in one extra query.
    async fn attach_suppliers(&self, products: Vec<Product>) -> DbResult<Vec<(Product, Supplier)>> {
        use std::collections::HashMap;

        if products.is_empty() {
            return Ok(Vec::new());
        }

        let suppliers: Vec<Supplier> = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, created_at, updated_at
            FROM suppliers
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let by_id: HashMap<i64, Supplier> =
            suppliers.into_iter().map(|s| (s.id, s)).collect();

        products
            .into_iter()
            .map(|product| {
                let supplier = by_id
                    .get(&product.supplier_id)
                    .cloned()
                    .ok_or_else(|| {
                        DbError::Internal(format!(
                            "product {} references missing supplier {}",
                            product.id, product.supplier_id
                        ))
                    })?;
                Ok((product, supplier))
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
