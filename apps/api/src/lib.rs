//! # Dukaan API
//!
//! REST server for the Dukaan inventory and sales-tracking service.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Dukaan API Server                              │
//! │                                                                         │
//! │  Browser ───► axum (3001) ───► Handlers ───► Repositories ───► SQLite   │
//! │                   │                                                     │
//! │                   └── AuthUser extractor (JWT bearer token)             │
//! │                       on every route except register/login              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Route Map
//! ```text
//! POST   /api/users/register          create account, issue token
//! POST   /api/users/login             verify password, issue token
//! GET    /api/users/profile           current user                 [auth]
//! GET    /api/suppliers               list w/ products             [auth]
//! POST   /api/suppliers               create                       [auth]
//! GET    /api/suppliers/:id           one w/ products              [auth]
//! PUT    /api/suppliers/:id           update                       [auth]
//! DELETE /api/suppliers/:id           delete (cascades)            [auth]
//! GET    /api/products                list w/ suppliers            [auth]
//! POST   /api/products                create batch                 [auth]
//! GET    /api/products/by-code/:code  batches of one SKU           [auth]
//! GET    /api/products/:id            one w/ supplier              [auth]
//! PUT    /api/products/:id            full update                  [auth]
//! PATCH  /api/products/:id/stock      set absolute stock           [auth]
//! DELETE /api/products/:id            delete batch                 [auth]
//! GET    /api/transactions            all sales, newest first      [auth]
//! POST   /api/transactions            record a sale                [auth]
//! GET    /api/transactions/summary    per-user aggregates          [auth]
//! GET    /api/transactions/user       own sales                    [auth]
//! GET    /api/transactions/:id        one sale                     [auth]
//! ```

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use routes::{products, suppliers, transactions, users};
use state::AppState;

/// Builds the application router with all routes and middleware.
///
/// Kept separate from `main` so tests can drive the full app in-process.
pub fn app(state: AppState) -> Router {
    // Wide-open CORS: the browser frontend is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        // Users
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users/profile", get(users::profile))
        // Suppliers
        .route(
            "/api/suppliers",
            get(suppliers::get_all_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/api/suppliers/:id",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
        // Products
        .route(
            "/api/products",
            get(products::get_all_products).post(products::create_product),
        )
        .route(
            "/api/products/by-code/:code",
            get(products::get_products_by_code),
        )
        .route(
            "/api/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/products/:id/stock", patch(products::update_stock))
        // Transactions
        .route(
            "/api/transactions",
            get(transactions::get_all_transactions).post(transactions::create_transaction),
        )
        .route(
            "/api/transactions/summary",
            get(transactions::get_transaction_summary),
        )
        .route(
            "/api/transactions/user",
            get(transactions::get_user_transactions),
        )
        .route("/api/transactions/:id", get(transactions::get_transaction))
        .layer(cors)
        .with_state(state)
}

/// `GET /` - unauthenticated landing route.
async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Dukaan API" }))
}

// =============================================================================
// Test Utilities
// =============================================================================

/// In-process test harness: builds the full app against an in-memory
/// database and drives it through tower's `Service` interface.
#[cfg(test)]
pub(crate) mod test_util {
    use axum::body::Body;
    use axum::http::{header, Request, Response};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ApiConfig;
    use crate::state::AppState;
    use dukaan_db::{Database, DbConfig};

    /// Full app over a fresh in-memory database.
    pub async fn test_app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_lifetime_secs: 3600,
        };

        crate::app(AppState::new(db, config))
    }

    /// Sends one request through the router.
    pub async fn request(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    /// Collects a response body as JSON.
    pub async fn body_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Registers a user and returns their token.
    pub async fn register_user(app: &Router, email: &str, shop_name: &str) -> String {
        let response = request(
            app,
            "POST",
            "/api/users/register",
            None,
            Some(json!({
                "email": email,
                "password": "hunter2hunter2",
                "name": "Asim",
                "shopName": shop_name,
                "contactInfo": null,
            })),
        )
        .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);

        body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Registers the default test user and returns their token.
    pub async fn register_and_login(app: &Router) -> String {
        register_user(app, "owner@dukaan.example", "Asim General Store").await
    }

    /// Creates a supplier and returns its id.
    pub async fn create_supplier(app: &Router, token: &str, name: &str) -> i64 {
        let response = request(
            app,
            "POST",
            "/api/suppliers",
            Some(token),
            Some(json!({ "name": name, "contactInfo": null })),
        )
        .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);

        body_json(response).await["id"].as_i64().unwrap()
    }

    /// Creates a product batch and returns its id.
    pub async fn create_product(app: &Router, token: &str, body: Value) -> i64 {
        let response = request(app, "POST", "/api/products", Some(token), Some(body)).await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);

        body_json(response).await["id"].as_i64().unwrap()
    }
}
