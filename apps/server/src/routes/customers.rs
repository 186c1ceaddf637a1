//! Customer routes.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use infinity_core::validation::validate_name;
use infinity_core::Customer;
use infinity_db::repository::generate_id;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Payload for both create and update.
#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// GET /customers
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Customer>>> {
    let customers = state.db.customers().list().await?;
    Ok(Json(customers))
}

/// POST /customers
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CustomerPayload>,
) -> ApiResult<Json<Customer>> {
    validate_name("name", &payload.name)?;

    let customer = Customer {
        id: generate_id(),
        name: payload.name,
        contact: payload.contact,
        email: payload.email,
        address: payload.address,
        created_at: Utc::now(),
    };
    state.db.customers().insert(&customer).await?;

    Ok(Json(customer))
}

/// PUT /customers/:id
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerPayload>,
) -> ApiResult<Json<Customer>> {
    validate_name("name", &payload.name)?;

    let mut customer = state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    customer.name = payload.name;
    customer.contact = payload.contact;
    customer.email = payload.email;
    customer.address = payload.address;
    state.db.customers().update(&customer).await?;

    Ok(Json(customer))
}

/// DELETE /customers/:id
///
/// Historical bills keep their customer snapshots.
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    state.db.customers().delete(&id).await?;

    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}
