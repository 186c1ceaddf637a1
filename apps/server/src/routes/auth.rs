//! Authentication routes: register and login.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use infinity_core::validation::validate_name;
use infinity_core::User;
use infinity_db::repository::generate_id;

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Credentials for both register and login.
#[derive(Debug, Deserialize)]
pub struct UserCredentials {
    pub username: String,
    pub password: String,
}

/// Public view of a user account. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserView,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCredentials>,
) -> ApiResult<Json<UserView>> {
    validate_name("username", &payload.username)?;

    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("Password must not be empty".to_string()));
    }

    if state.db.users().username_exists(&payload.username).await? {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let user = User {
        id: generate_id(),
        username: payload.username,
        password_hash: hash_password(&payload.password)?,
        created_at: Utc::now(),
    };
    state.db.users().insert(&user).await?;

    info!(username = %user.username, "User registered");
    Ok(Json(user.into()))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserCredentials>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .db
        .users()
        .get_by_username(&payload.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = state.jwt.generate_token(&user.username)?;

    info!(username = %user.username, "User logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user: user.into(),
    }))
}
