//! Category routes.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use infinity_core::validation::validate_name;
use infinity_core::Category;
use infinity_db::repository::generate_id;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Payload for both create and update.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// GET /categories
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.db.categories().list().await?;
    Ok(Json(categories))
}

/// POST /categories
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> ApiResult<Json<Category>> {
    validate_name("name", &payload.name)?;

    let category = Category {
        id: generate_id(),
        name: payload.name,
        description: payload.description,
        created_at: Utc::now(),
    };
    state.db.categories().insert(&category).await?;

    Ok(Json(category))
}

/// PUT /categories/:id
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> ApiResult<Json<Category>> {
    validate_name("name", &payload.name)?;

    let mut category = state
        .db
        .categories()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    category.name = payload.name;
    category.description = payload.description;
    state.db.categories().update(&category).await?;

    Ok(Json(category))
}

/// DELETE /categories/:id
///
/// Rejected with 400 while any product still references the category.
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if state.db.categories().product_count(&id).await? > 0 {
        return Err(ApiError::BadRequest(
            "Cannot delete category with existing products".to_string(),
        ));
    }

    state
        .db
        .categories()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    state.db.categories().delete(&id).await?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
