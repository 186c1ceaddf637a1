//! Bill routes.
//!
//! Bills are append-only: they can be created and read, never edited.
//! Creation is fully transactional; a failed line leaves no trace.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use infinity_core::validation::validate_bill_quantity;
use infinity_core::{Bill, BillItem, BillItemRequest};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Payload for bill creation.
#[derive(Debug, Deserialize)]
pub struct BillCreate {
    pub customer_id: String,
    pub items: Vec<BillItemRequest>,
}

/// Wire view of a bill line item, prices in major units.
#[derive(Debug, Serialize)]
pub struct BillItemView {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub subtotal: f64,
}

impl From<BillItem> for BillItemView {
    fn from(item: BillItem) -> Self {
        BillItemView {
            price: item.unit_price().as_major_units(),
            subtotal: item.subtotal().as_major_units(),
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
        }
    }
}

/// Wire view of a bill, total in major units.
#[derive(Debug, Serialize)]
pub struct BillView {
    pub id: String,
    pub bill_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub date: DateTime<Utc>,
    pub items: Vec<BillItemView>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Bill> for BillView {
    fn from(bill: Bill) -> Self {
        BillView {
            total: bill.total().as_major_units(),
            id: bill.id,
            bill_number: bill.bill_number,
            customer_id: bill.customer_id,
            customer_name: bill.customer_name,
            customer_contact: bill.customer_contact,
            date: bill.date,
            items: bill.items.into_iter().map(BillItemView::from).collect(),
            created_at: bill.created_at,
        }
    }
}

/// GET /bills - newest first.
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<BillView>>> {
    let bills = state.db.bills().list().await?;
    Ok(Json(bills.into_iter().map(BillView::from).collect()))
}

/// POST /bills
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<BillCreate>,
) -> ApiResult<Json<BillView>> {
    if payload.items.is_empty() {
        return Err(ApiError::BadRequest(
            "Bill must contain at least one item".to_string(),
        ));
    }

    for item in &payload.items {
        validate_bill_quantity(item.quantity)?;
    }

    let customer = state
        .db
        .customers()
        .get_by_id(&payload.customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    let bill = state.db.bills().create(&customer, &payload.items).await?;

    Ok(Json(bill.into()))
}

/// GET /bills/:id
pub async fn get(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BillView>> {
    let bill = state
        .db
        .bills()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bill not found".to_string()))?;

    Ok(Json(bill.into()))
}
