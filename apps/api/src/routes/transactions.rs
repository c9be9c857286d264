//! Transaction (sale) routes.
//!
//! ## Sale Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │            POST /api/transactions { productId, quantity }               │
//! │                                                                         │
//! │  1. Load the product row                    missing → 404               │
//! │  2. Latest batch for its code               none    → 404               │
//! │  3. Σ stock across batches, Σ sold across prior sales                   │
//! │  4. check_stock(available, requested)       short   → 400 with numbers  │
//! │  5. Insert at the latest batch's price      → 201                       │
//! │                                                                         │
//! │  Steps 1-5 run without a wrapping DB transaction: two concurrent        │
//! │  sales can both pass step 4 and oversell. Known, documented gap.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use dukaan_core::stock::check_stock;
use dukaan_core::validation::{validate_price_cents, validate_quantity};
use dukaan_core::{CoreError, Product, Transaction};
use dukaan_db::{HydratedTransaction, SalesSummary, TopProduct};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// Product ROW id the sale is entered against (not the product code).
    pub product_id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub discount_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUser {
    pub id: i64,
    pub name: String,
    pub shop_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithRefs {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub user: TransactionUser,
    pub product: Product,
}

impl From<HydratedTransaction> for TransactionWithRefs {
    fn from(hydrated: HydratedTransaction) -> Self {
        TransactionWithRefs {
            transaction: hydrated.transaction,
            user: TransactionUser {
                id: hydrated.user.id,
                name: hydrated.user.name,
                shop_name: hydrated.user.shop_name,
            },
            product: hydrated.product,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductResponse {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: i64,
    pub sales_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_sales_cents: i64,
    pub total_transactions: i64,
    pub top_products: Vec<TopProductResponse>,
}

impl From<SalesSummary> for SummaryResponse {
    fn from(summary: SalesSummary) -> Self {
        SummaryResponse {
            total_sales_cents: summary.total_sales_cents,
            total_transactions: summary.total_transactions,
            top_products: summary
                .top_products
                .into_iter()
                .map(
                    |TopProduct {
                         product_id,
                         product_name,
                         quantity_sold,
                         sales_cents,
                     }| TopProductResponse {
                        product_id,
                        product_name,
                        quantity_sold,
                        sales_cents,
                    },
                )
                .collect(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/transactions`
pub async fn create_transaction(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_quantity(req.quantity)?;
    validate_price_cents("discountCents", req.discount_cents)?;

    let products = state.db.products();
    let transactions = state.db.transactions();

    // The specific row the sale was entered against gives us the code
    let (product, _) = products
        .get(req.product_id)
        .await?
        .ok_or(CoreError::ProductNotFound(req.product_id))?;

    // The newest batch's price is what the sale captures
    let latest = transactions
        .latest_batch_for_code(&product.product_code)
        .await?
        .ok_or_else(|| CoreError::ProductCodeNotFound(product.product_code.clone()))?;

    let total_stock = transactions
        .total_stock_for_code(&product.product_code)
        .await?;
    let total_sold = transactions
        .total_sold_for_code(&product.product_code)
        .await?;

    let available = check_stock(
        &product.product_code,
        total_stock,
        total_sold,
        req.quantity,
    )?;

    info!(
        product_code = %product.product_code,
        total_stock,
        total_sold,
        available,
        requested = req.quantity,
        "Stock check passed"
    );

    let transaction = transactions
        .insert(
            user.id,
            req.product_id,
            req.quantity,
            latest.selling_price_cents,
            req.discount_cents,
        )
        .await?;

    info!(
        transaction_id = transaction.id,
        total_cents = transaction.line_total().cents(),
        "Sale recorded"
    );

    let hydrated = transactions
        .get(transaction.id)
        .await?
        .ok_or_else(|| ApiError::Internal("inserted transaction vanished".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionWithRefs::from(hydrated)),
    ))
}

/// `GET /api/transactions`
pub async fn get_all_transactions(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionWithRefs>>, ApiError> {
    let transactions = state.db.transactions().list().await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// `GET /api/transactions/user`
pub async fn get_user_transactions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionWithRefs>>, ApiError> {
    let transactions = state.db.transactions().list_for_user(user.id).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// `GET /api/transactions/summary`
pub async fn get_transaction_summary(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state.db.transactions().summary_for_user(user.id).await?;

    Ok(Json(summary.into()))
}

/// `GET /api/transactions/:id`
pub async fn get_transaction(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TransactionWithRefs>, ApiError> {
    let transaction = state
        .db
        .transactions()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".to_string()))?;

    Ok(Json(transaction.into()))
}

// =============================================================================
// Endpoint Tests
// =============================================================================
