//! # Infinity Server
//!
//! HTTP/JSON backend for the Infinity POS inventory and billing system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Lifecycle                                │
//! │                                                                         │
//! │  Client ───► axum Router ───► AuthUser extractor ───► Handler          │
//! │                  │                 (JWT check)           │              │
//! │                  │                                       ▼              │
//! │             CORS + Trace                          Repositories         │
//! │               layers                              (infinity-db)        │
//! │                                                        │               │
//! │                                                        ▼               │
//! │                                                     SQLite             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - HTTP server port (default: 8000)
//! - `DATABASE_PATH` - SQLite file path (default: ./data/infinity.db)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_LIFETIME_SECS` - Token lifetime (default: 86400, 24 hours)
//! - `CORS_ORIGINS` - Allowed origins, comma-separated, or "*"

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod seed;

// Re-exports
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

use infinity_db::Database;

use crate::auth::JwtManager;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
}

/// Builds the application router with CORS applied.
pub fn app(state: AppState, cors_origins: &str) -> axum::Router {
    routes::router(state).layer(routes::cors_layer(cors_origins))
}
