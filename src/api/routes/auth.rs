//! Registration, login, and the current-user endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, AuthUser};
use crate::auth::{hash_password, verify_password};
use crate::models::PublicUser;

/// Shortest password accepted at registration.
const MIN_PASSWORD_LEN: usize = 6;

/// One message for unknown email and wrong password, so login failures
/// reveal nothing about which half was wrong.
const BAD_CREDENTIALS: &str = "invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DevLoginRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest(format!("invalid email: {email}")));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .db
        .create_user(email, req.name.as_deref(), Some(&password_hash))?
        .ok_or_else(|| ApiError::BadRequest("email already registered".to_string()))?;

    tracing::info!(user_id = user.id, "account registered");
    let token = state.token_keys.issue(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .db
        .find_user_by_email(req.email.trim())?
        .ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;
    if !verify_password(&req.password, stored_hash)? {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let token = state.token_keys.issue(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

/// Email-only login for local development; creates the account on first
/// use. Refused unless explicitly enabled in configuration.
pub async fn dev_login(
    State(state): State<AppState>,
    Json(req): Json<DevLoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if !state.dev_login_enabled {
        return Err(ApiError::Forbidden("dev login is disabled".to_string()));
    }

    let email = req.email.as_deref().unwrap_or("dev@test.com");
    let name = req.name.as_deref().unwrap_or("Dev User");
    let user = state.db.get_or_create_user(email, Some(name))?;

    let token = state.token_keys.issue(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .db
        .find_user_by_id(auth.user_id)?
        .ok_or_else(|| ApiError::Unauthorized("invalid token".to_string()))?;
    Ok(Json(user.public()))
}
