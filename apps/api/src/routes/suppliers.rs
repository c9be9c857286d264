//! Supplier routes. Standard CRUD; reads include the supplier's products.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use dukaan_core::validation::validate_name;
use dukaan_core::{Product, Supplier};
use dukaan_db::SupplierChanges;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    pub name: String,
    pub contact_info: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierWithProducts {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub products: Vec<Product>,
}

impl From<(Supplier, Vec<Product>)> for SupplierWithProducts {
    fn from((supplier, products): (Supplier, Vec<Product>)) -> Self {
        SupplierWithProducts { supplier, products }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/suppliers`
pub async fn get_all_suppliers(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SupplierWithProducts>>, ApiError> {
    let suppliers = state.db.suppliers().list_with_products().await?;

    Ok(Json(suppliers.into_iter().map(Into::into).collect()))
}

/// `GET /api/suppliers/:id`
pub async fn get_supplier(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SupplierWithProducts>, ApiError> {
    let supplier = state
        .db
        .suppliers()
        .get_with_products(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Supplier not found".to_string()))?;

    Ok(Json(supplier.into()))
}

/// `POST /api/suppliers`
pub async fn create_supplier(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name("name", &req.name)?;

    let supplier = state
        .db
        .suppliers()
        .insert(&SupplierChanges {
            name: req.name,
            contact_info: req.contact_info,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

/// `PUT /api/suppliers/:id`
pub async fn update_supplier(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SupplierPayload>,
) -> Result<Json<Supplier>, ApiError> {
    validate_name("name", &req.name)?;

    let supplier = state
        .db
        .suppliers()
        .update(
            id,
            &SupplierChanges {
                name: req.name,
                contact_info: req.contact_info,
            },
        )
        .await?;

    Ok(Json(supplier))
}

/// `DELETE /api/suppliers/:id`
pub async fn delete_supplier(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.suppliers().delete(id).await?;

    Ok(Json(json!({ "message": "Supplier deleted successfully" })))
}

// =============================================================================
// Endpoint Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_util::{body_json, register_and_login, request, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_suppliers_require_auth() {
        let app = test_app().await;

        let response = request(&app, "GET", "/api/suppliers", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let app = test_app().await;
        let token = register_and_login(&app).await;

        // Create
        let created = request(
            &app,
            "POST",
            "/api/suppliers",
            Some(&token),
            Some(json!({ "name": "Metro Wholesale", "contactInfo": "021-111" })),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["name"], "Metro Wholesale");

        // List includes products array
        let list = request(&app, "GET", "/api/suppliers", Some(&token), None).await;
        assert_eq!(list.status(), StatusCode::OK);
        let list = body_json(list).await;
        assert_eq!(list[0]["id"].as_i64().unwrap(), id);
        assert!(list[0]["products"].as_array().unwrap().is_empty());

        // Update
        let updated = request(
            &app,
            "PUT",
            &format!("/api/suppliers/{id}"),
            Some(&token),
            Some(json!({ "name": "Metro Cash & Carry", "contactInfo": null })),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::OK);
        assert_eq!(body_json(updated).await["name"], "Metro Cash & Carry");

        // Delete
        let deleted = request(
            &app,
            "DELETE",
            &format!("/api/suppliers/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(deleted.status(), StatusCode::OK);

        let missing = request(
            &app,
            "GET",
            &format!("/api/suppliers/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(missing).await["error"], "Supplier not found");
    }

    #[tokio::test]
    async fn test_update_missing_supplier_is_404() {
        let app = test_app().await;
        let token = register_and_login(&app).await;

        let response = request(
            &app,
            "PUT",
            "/api/suppliers/999",
            Some(&token),
            Some(json!({ "name": "Nobody", "contactInfo": null })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_with_empty_name_is_400() {
        let app = test_app().await;
        let token = register_and_login(&app).await;

        let response = request(
            &app,
            "POST",
            "/api/suppliers",
            Some(&token),
            Some(json!({ "name": "   ", "contactInfo": null })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
