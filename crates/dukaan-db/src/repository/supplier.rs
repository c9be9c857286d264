//! # Supplier Repository
//!
//! Database operations for suppliers. Reads include the supplier's products,
//! matching what the catalog screens show.

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use dukaan_core::{Product, Supplier};

/// Fields accepted when creating or updating a supplier.
#[derive(Debug, Clone)]
pub struct SupplierChanges {
    pub name: String,
    pub contact_info: Option<String>,
}

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists all suppliers, each with its products.
    pub async fn list_with_products(&self) -> DbResult<Vec<(Supplier, Vec<Product>)>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, created_at, updated_at
            FROM suppliers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_code, name, sku, purchase_rate_cents, selling_price_cents,
                   stock_quantity, supplier_id, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_supplier: HashMap<i64, Vec<Product>> = HashMap::new();
        for product in products {
            by_supplier.entry(product.supplier_id).or_default().push(product);
        }

        Ok(suppliers
            .into_iter()
            .map(|supplier| {
                let products = by_supplier.remove(&supplier.id).unwrap_or_default();
                (supplier, products)
            })
            .collect())
    }

    /// Gets one supplier with its products.
    ///
    /// ## Returns
    /// * `Ok(Some((Supplier, Vec<Product>)))` - Supplier found
    /// * `Ok(None)` - Supplier not found
    pub async fn get_with_products(&self, id: i64) -> DbResult<Option<(Supplier, Vec<Product>)>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(supplier) = supplier else {
            return Ok(None);
        };

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_code, name, sku, purchase_rate_cents, selling_price_cents,
                   stock_quantity, supplier_id, created_at, updated_at
            FROM products
            WHERE supplier_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some((supplier, products)))
    }

    /// Inserts a new supplier.
    pub async fn insert(&self, changes: &SupplierChanges) -> DbResult<Supplier> {
        debug!(name = %changes.name, "Inserting supplier");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (name, contact_info, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.contact_info)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Updates an existing supplier.
    ///
    /// ## Returns
    /// * `Ok(Supplier)` - Updated supplier
    /// * `Err(DbError::NotFound)` - Supplier doesn't exist
    pub async fn update(&self, id: i64, changes: &SupplierChanges) -> DbResult<Supplier> {
        debug!(id = %id, "Updating supplier");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = ?2, contact_info = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.contact_info)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_info, created_at, updated_at
            FROM suppliers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Deletes a supplier. Cascades to its products.
    ///
    /// ## Returns
    /// * `Ok(())` - Deleted
    /// * `Err(DbError::NotFound)` - Supplier doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let db = test_db().await;
        let repo = db.suppliers();

        let created = repo
            .insert(&SupplierChanges {
                name: "Metro Wholesale".to_string(),
                contact_info: None,
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                &SupplierChanges {
                    name: "Metro Cash & Carry".to_string(),
                    contact_info: Some("021-111".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Metro Cash & Carry");

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_with_products(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_supplier_is_not_found() {
        let db = test_db().await;

        let err = db
            .suppliers()
            .update(
                99,
                &SupplierChanges {
                    name: "Nobody".to_string(),
                    contact_info: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reads_include_products() {
        let db = test_db().await;

        let supplier = db
            .suppliers()
            .insert(&SupplierChanges {
                name: "Metro Wholesale".to_string(),
                contact_info: None,
            })
            .await
            .unwrap();

        db.products()
            .insert(&NewProduct {
                name: "Sugar 1kg".to_string(),
                sku: "SUGAR-1KG".to_string(),
                purchase_rate_cents: 14000,
                selling_price_cents: 15500,
                stock_quantity: 40,
                supplier_id: supplier.id,
            })
            .await
            .unwrap();

        let (found, products) = db
            .suppliers()
            .get_with_products(supplier.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, supplier.id);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_code, "sugar-1kg");

        let all = db.suppliers().list_with_products().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].1.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_products() {
        let db = test_db().await;

        let supplier = db
            .suppliers()
            .insert(&SupplierChanges {
                name: "Metro Wholesale".to_string(),
                contact_info: None,
            })
            .await
            .unwrap();

        let (product, _) = db
            .products()
            .insert(&NewProduct {
                name: "Sugar 1kg".to_string(),
                sku: "SUGAR-1KG".to_string(),
                purchase_rate_cents: 14000,
                selling_price_cents: 15500,
                stock_quantity: 40,
                supplier_id: supplier.id,
            })
            .await
            .unwrap();

        db.suppliers().delete(supplier.id).await.unwrap();
        assert!(db.products().get(product.id).await.unwrap().is_none());
    }
}
