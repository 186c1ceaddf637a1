//! # HTTP Routes
//!
//! Route handlers and the router assembly.
//!
//! ## Endpoint Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Surface                                    │
//! │                                                                         │
//! │  Public:                                                                │
//! │    POST /auth/register          Create an operator account              │
//! │    POST /auth/login             Exchange credentials for a JWT          │
//! │    POST /init-data              Seed the demo dataset (idempotent)      │
//! │                                                                         │
//! │  Bearer token required:                                                 │
//! │    GET  /dashboard/stats                                                │
//! │    GET|POST /categories      PUT|DELETE /categories/:id                 │
//! │    GET|POST /products        PUT|DELETE /products/:id                   │
//! │    GET|POST /customers       PUT|DELETE /customers/:id                  │
//! │    GET|POST /bills           GET /bills/:id                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod bills;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod products;

use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiResult;
use crate::seed::{self, SeedOutcome, ADMIN_PASSWORD, ADMIN_USERNAME};
use crate::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Auth (public)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Dashboard
        .route("/dashboard/stats", get(dashboard::stats))
        // Categories
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            put(categories::update).delete(categories::delete),
        )
        // Products
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            put(products::update).delete(products::delete),
        )
        // Customers
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/:id",
            put(customers::update).delete(customers::delete),
        )
        // Bills
        .route("/bills", get(bills::list).post(bills::create))
        .route("/bills/:id", get(bills::get))
        // Demo seeding (public, idempotent)
        .route("/init-data", post(init_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds a CORS layer from the configured origin list.
///
/// "*" means any origin; otherwise a comma-separated list of exact origins.
pub fn cors_layer(origins: &str) -> CorsLayer {
    if origins.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// POST /init-data - seeds the demo dataset.
async fn init_data(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    match seed::initialize_sample_data(&state.db).await? {
        SeedOutcome::AlreadyExists => Ok(Json(json!({
            "message": "Sample data already exists"
        }))),
        SeedOutcome::Created => Ok(Json(json!({
            "message": "Sample data initialized successfully",
            "admin_credentials": {
                "username": ADMIN_USERNAME,
                "password": ADMIN_PASSWORD,
            }
        }))),
    }
}
