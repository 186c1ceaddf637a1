//! # Repository Module
//!
//! Database repository implementations for Infinity POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list()                                           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self)                                                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, product)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Operator accounts
//! - [`category::CategoryRepository`] - Category CRUD
//! - [`product::ProductRepository`] - Product CRUD with read-time category join
//! - [`customer::CustomerRepository`] - Customer CRUD
//! - [`bill::BillRepository`] - Transactional bill creation and listing
//! - [`reports::ReportsRepository`] - Dashboard aggregates

pub mod bill;
pub mod category;
pub mod customer;
pub mod product;
pub mod reports;
pub mod user;

use uuid::Uuid;

/// Generates a new entity ID (UUID v4 as string).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
