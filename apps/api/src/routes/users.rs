//! User routes: registration, login, profile.
//!
//! Register and login are the only unauthenticated routes in the API.
//! Both return the same `{user, token}` shape so the frontend can store
//! the token and render the account in one step.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;
use dukaan_core::validation::{validate_email, validate_name, validate_password};
use dukaan_core::{CoreError, User};
use dukaan_db::NewUser;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub shop_name: String,
    pub contact_info: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/users/register`
///
/// Rejects duplicate emails with 400, hashes the password, inserts the
/// user, and issues a signed token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_name("name", &req.name)?;
    validate_name("shopName", &req.shop_name)?;

    let users = state.db.users();

    // Pre-check for a friendlier message; the UNIQUE index still backs
    // this up against races
    if users.find_by_email(&req.email).await?.is_some() {
        return Err(CoreError::EmailTaken(req.email).into());
    }

    let password_hash = hash_password(&req.password)?;

    let user = users
        .insert(&NewUser {
            email: req.email,
            password_hash,
            name: req.name,
            shop_name: req.shop_name,
            contact_info: req.contact_info,
        })
        .await?;

    let token = state.jwt.generate_token(user.id)?;

    info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// `POST /api/users/login`
///
/// Unknown email and wrong password both answer 400 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .db
        .users()
        .find_by_email(&req.email)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(CoreError::InvalidCredentials.into());
    }

    let token = state.jwt.generate_token(user.id)?;

    info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse { user, token }))
}

/// `GET /api/users/profile`
pub async fn profile(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

// =============================================================================
// Endpoint Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::test_util::{body_json, request, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    fn register_body(email: &str) -> serde_json::Value {
        json!({
            "email": email,
            "password": "hunter2hunter2",
            "name": "Asim",
            "shopName": "Asim General Store",
            "contactInfo": "0300-1234567",
        })
    }

    #[tokio::test]
    async fn test_register_returns_user_and_token() {
        let app = test_app().await;

        let response = request(
            &app,
            "POST",
            "/api/users/register",
            None,
            Some(register_body("owner@dukaan.example")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["user"]["email"], "owner@dukaan.example");
        assert_eq!(body["user"]["shopName"], "Asim General Store");
        assert!(body["token"].as_str().unwrap().contains('.'));
        // The hash must never leak
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_400() {
        let app = test_app().await;

        let first = request(
            &app,
            "POST",
            "/api/users/register",
            None,
            Some(register_body("owner@dukaan.example")),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = request(
            &app,
            "POST",
            "/api/users/register",
            None,
            Some(register_body("owner@dukaan.example")),
        )
        .await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body = body_json(second).await;
        assert_eq!(body["error"], "User already exists");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email_and_short_password() {
        let app = test_app().await;

        let bad_email = register_body("not-an-email");
        let response = request(&app, "POST", "/api/users/register", None, Some(bad_email)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut short_password = register_body("owner@dukaan.example");
        short_password["password"] = json!("short");
        let response =
            request(&app, "POST", "/api/users/register", None, Some(short_password)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_400() {
        let app = test_app().await;

        request(
            &app,
            "POST",
            "/api/users/register",
            None,
            Some(register_body("owner@dukaan.example")),
        )
        .await;

        let response = request(
            &app,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "owner@dukaan.example", "password": "wrong-password" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_400() {
        let app = test_app().await;

        let response = request(
            &app,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "ghost@dukaan.example", "password": "hunter2hunter2" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_then_profile() {
        let app = test_app().await;

        request(
            &app,
            "POST",
            "/api/users/register",
            None,
            Some(register_body("owner@dukaan.example")),
        )
        .await;

        let login = request(
            &app,
            "POST",
            "/api/users/login",
            None,
            Some(json!({ "email": "owner@dukaan.example", "password": "hunter2hunter2" })),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
        let token = body_json(login).await["token"].as_str().unwrap().to_string();

        let profile = request(&app, "GET", "/api/users/profile", Some(&token), None).await;
        assert_eq!(profile.status(), StatusCode::OK);
        let body = body_json(profile).await;
        assert_eq!(body["email"], "owner@dukaan.example");
    }

    #[tokio::test]
    async fn test_profile_without_token_is_401() {
        let app = test_app().await;

        let response = request(&app, "GET", "/api/users/profile", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Please authenticate");
    }
}
