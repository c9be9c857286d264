//! # API Error Type
//!
//! Unified error type for route handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Flow in Dukaan                               │
//! │                                                                         │
//! │  Handler                                                                │
//! │  Result<T, ApiError>                                                    │
//! │     │                                                                   │
//! │     ├── ValidationError / CoreError ──► 400 {"error": "..."}            │
//! │     ├── DbError::NotFound ───────────► 404 {"error": "..."}             │
//! │     ├── missing/invalid token ───────► 401 {"error": "Please            │
//! │     │                                       authenticate"}              │
//! │     ├── InsufficientStock ───────────► 400 {"error": "...",             │
//! │     │                                       "availableStock": N,        │
//! │     │                                       "requestedQuantity": M}     │
//! │     └── everything else ─────────────► 500 {"error": "Server error"}    │
//! │                                        (detail only in server logs)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use dukaan_core::{CoreError, ValidationError};
use dukaan_db::DbError;

/// API error returned from route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Input validation failed, duplicate email, bad credentials (400).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid bearer token (401).
    #[error("Please authenticate")]
    Unauthorized,

    /// Sale requested more than the available stock (400, with numbers).
    #[error("Not enough stock available")]
    InsufficientStock { available: i64, requested: i64 },

    /// Anything else (500). The detail is logged, never sent to the client.
    #[error("Server error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }

            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }

            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Please authenticate" }),
            ),

            ApiError::InsufficientStock {
                available,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Not enough stock available",
                    "availableStock": available,
                    "requestedQuantity": requested,
                }),
            ),

            ApiError::Internal(detail) => {
                // Log the real cause; the client gets a generic body
                tracing::error!(detail = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => {
                ApiError::NotFound(format!("{} not found", entity))
            }
            DbError::UniqueViolation { field, .. } => {
                ApiError::Validation(format!("{} already exists", field))
            }
            DbError::ForeignKeyViolation { .. } => {
                ApiError::Validation("Invalid reference".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Converts core domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => {
                ApiError::NotFound("Product not found".to_string())
            }
            CoreError::ProductCodeNotFound(_) => {
                ApiError::NotFound("No products available with this product code".to_string())
            }
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => ApiError::InsufficientStock {
                available,
                requested,
            },
            CoreError::EmailTaken(_) => ApiError::Validation("User already exists".to_string()),
            CoreError::InvalidCredentials => {
                ApiError::Validation("Invalid credentials".to_string())
            }
            CoreError::Validation(e) => ApiError::Validation(e.to_string()),
        }
    }
}

/// Converts bare validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Supplier", 7).into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Supplier not found");
    }

    #[test]
    fn test_insufficient_stock_carries_numbers() {
        let core = CoreError::InsufficientStock {
            product_code: "sugar-1kg".to_string(),
            available: 6,
            requested: 9,
        };
        let err: ApiError = core.into();
        match err {
            ApiError::InsufficientStock {
                available,
                requested,
            } => {
                assert_eq!(available, 6);
                assert_eq!(requested, 9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_query_failures_collapse_to_internal() {
        let err: ApiError = DbError::QueryFailed("syntax error".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.to_string(), "Server error");
    }
}
