//! Product routes.
//!
//! CRUD on batch rows plus the by-code lookup that powers the price-history
//! view. Every read returns the batch with its supplier attached. The
//! product code is derived from the submitted SKU on every write, never
//! accepted from the client.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use dukaan_core::validation::{
    validate_name, validate_price_cents, validate_sku, validate_stock_quantity,
};
use dukaan_core::{Product, Supplier};
use dukaan_db::NewProduct;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub sku: String,
    pub purchase_rate_cents: i64,
    pub selling_price_cents: i64,
    pub stock_quantity: i64,
    pub supplier_id: i64,
}

impl ProductPayload {
    fn validate(&self) -> Result<(), ApiError> {
        validate_name("name", &self.name)?;
        validate_sku(&self.sku)?;
        validate_price_cents("purchaseRateCents", self.purchase_rate_cents)?;
        validate_price_cents("sellingPriceCents", self.selling_price_cents)?;
        validate_stock_quantity(self.stock_quantity)?;
        Ok(())
    }

    fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name,
            sku: self.sku,
            purchase_rate_cents: self.purchase_rate_cents,
            selling_price_cents: self.selling_price_cents,
            stock_quantity: self.stock_quantity,
            supplier_id: self.supplier_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPayload {
    pub stock_quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithSupplier {
    #[serde(flatten)]
    pub product: Product,
    pub supplier: Supplier,
}

impl From<(Product, Supplier)> for ProductWithSupplier {
    fn from((product, supplier): (Product, Supplier)) -> Self {
        ProductWithSupplier { product, supplier }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products`
pub async fn get_all_products(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductWithSupplier>>, ApiError> {
    let products = state.db.products().list().await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// `GET /api/products/:id`
pub async fn get_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductWithSupplier>, ApiError> {
    let product = state
        .db
        .products()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product.into()))
}

/// `GET /api/products/by-code/:code`
///
/// Every batch sharing the code, cheapest purchase rate first.
/// 404 when the code has no batches at all.
pub async fn get_products_by_code(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<ProductWithSupplier>>, ApiError> {
    let batches = state.db.products().list_by_code(&code).await?;

    if batches.is_empty() {
        return Err(ApiError::NotFound(
            "No products found with this product code".to_string(),
        ));
    }

    Ok(Json(batches.into_iter().map(Into::into).collect()))
}

/// `POST /api/products`
pub async fn create_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let product = state.db.products().insert(&req.into_new_product()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductWithSupplier::from(product)),
    ))
}

/// `PUT /api/products/:id`
///
/// Full update; the product code is recomputed from the submitted SKU.
pub async fn update_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProductPayload>,
) -> Result<Json<ProductWithSupplier>, ApiError> {
    req.validate()?;

    let product = state
        .db
        .products()
        .update(id, &req.into_new_product())
        .await?;

    Ok(Json(product.into()))
}

/// `PATCH /api/products/:id/stock`
///
/// Sets the batch's recorded stock to an absolute value.
pub async fn update_stock(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StockPayload>,
) -> Result<Json<ProductWithSupplier>, ApiError> {
    validate_stock_quantity(req.stock_quantity)?;

    let product = state.db.products().set_stock(id, req.stock_quantity).await?;

    Ok(Json(product.into()))
}

/// `DELETE /api/products/:id`
pub async fn delete_product(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.products().delete(id).await?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

// =============================================================================
// Endpoint Tests
// =============================================================================
