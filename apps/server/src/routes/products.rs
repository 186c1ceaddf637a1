//! Product routes.
//!
//! Prices cross the JSON boundary as decimal major units (850.0) and are
//! stored internally in integer cents. The conversion happens here and
//! nowhere else.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use infinity_core::validation::{validate_name, validate_price_cents, validate_stock_quantity};
use infinity_core::{Money, Product};
use infinity_db::repository::generate_id;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Payload for product creation.
#[derive(Debug, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category_id: String,
    /// Unit price in major units (e.g. 850.0).
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

/// Payload for partial product update. Absent fields keep their value.
#[derive(Debug, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Wire view of a product, price in major units.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub category_name: String,
    pub price: f64,
    pub quantity: i64,
    pub image_url: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        ProductView {
            price: product.price().as_major_units(),
            id: product.id,
            name: product.name,
            category_id: product.category_id,
            category_name: product.category_name,
            quantity: product.quantity,
            image_url: product.image_url,
            description: product.description,
            created_at: product.created_at,
        }
    }
}

/// GET /products
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProductView>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// POST /products
pub async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ProductCreate>,
) -> ApiResult<Json<ProductView>> {
    validate_name("name", &payload.name)?;

    let price = Money::from_major_units(payload.price);
    validate_price_cents(price.cents())?;
    validate_stock_quantity(payload.quantity)?;

    let category = state
        .db
        .categories()
        .get_by_id(&payload.category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let product = Product {
        id: generate_id(),
        name: payload.name,
        category_id: category.id,
        category_name: category.name,
        price_cents: price.cents(),
        quantity: payload.quantity,
        image_url: payload.image_url,
        description: payload.description,
        created_at: Utc::now(),
    };
    state.db.products().insert(&product).await?;

    Ok(Json(product.into()))
}

/// PUT /products/:id
///
/// Partial update: only fields present in the payload change. Changing the
/// category refreshes the stored category-name snapshot.
pub async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<Json<ProductView>> {
    let mut product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    if let Some(name) = payload.name {
        validate_name("name", &name)?;
        product.name = name;
    }

    if let Some(category_id) = payload.category_id {
        let category = state
            .db
            .categories()
            .get_by_id(&category_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
        product.category_id = category.id;
        product.category_name = category.name;
    }

    if let Some(price) = payload.price {
        let price = Money::from_major_units(price);
        validate_price_cents(price.cents())?;
        product.price_cents = price.cents();
    }

    if let Some(quantity) = payload.quantity {
        validate_stock_quantity(quantity)?;
        product.quantity = quantity;
    }

    if let Some(image_url) = payload.image_url {
        product.image_url = image_url;
    }

    if let Some(description) = payload.description {
        product.description = description;
    }

    state.db.products().update(&product).await?;

    Ok(Json(product.into()))
}

/// DELETE /products/:id
pub async fn delete(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    state.db.products().delete(&id).await?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
