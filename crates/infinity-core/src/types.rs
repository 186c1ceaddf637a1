//! # Domain Types
//!
//! Core domain types used throughout Infinity POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│     Product     │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  category_id    │   │  name           │       │
//! │  │  description    │   │  category_name* │   │  contact        │       │
//! │  └─────────────────┘   │  price_cents    │   └────────┬────────┘       │
//! │                        │  quantity       │            │ snapshotted    │
//! │                        └────────┬────────┘            │                │
//! │                                 │ snapshotted         ▼                │
//! │                                 ▼               ┌─────────────────┐    │
//! │                        ┌─────────────────┐      │      Bill       │    │
//! │                        │    BillItem     │─────►│  ─────────────  │    │
//! │                        │  ─────────────  │      │  bill_number    │    │
//! │                        │  product_name*  │      │  customer_name* │    │
//! │                        │  unit_price*    │      │  total_cents    │    │
//! │                        │  subtotal       │      │  items          │    │
//! │                        └─────────────────┘      └─────────────────┘    │
//! │                                                                         │
//! │  * = snapshot field: copied at write time, never retroactively updated │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Bills have two identifiers:
//! - `id`: UUID v4 - immutable, used for lookups and relations
//! - `bill_number`: human-readable sequential display number (`INF-00001`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// User
// =============================================================================

/// An operator account. The password hash never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login name, unique across the system.
    pub username: String,

    /// Argon2 hash of the password. Never serialized outward; the API layer
    /// converts to a public view before responding.
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
///
/// Deletable only while no product references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in listings and snapshotted onto bill items.
    pub name: String,

    /// Owning category.
    pub category_id: String,

    /// Cached copy of the category name, refreshed whenever `category_id`
    /// changes. The product list view joins against current categories at
    /// read time, which wins over this snapshot; treat the stored value as a
    /// best-effort display hint.
    pub category_name: String,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units in stock. Never negative; billing decrements it with a
    /// conditional update.
    pub quantity: i64,

    pub image_url: String,

    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity can be fulfilled from stock.
    #[inline]
    pub fn in_stock(&self, requested: i64) -> bool {
        self.quantity >= requested
    }

    /// Whether this product counts as low stock for dashboard reporting.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
///
/// Bills snapshot the name and contact at creation time, so deleting a
/// customer leaves historical bills intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line item embedded in a bill.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BillItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line total (unit_price × quantity) in cents.
    pub subtotal_cents: i64,
}

impl BillItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Bill
// =============================================================================

/// An immutable sales bill. Once created, there is no update or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bill {
    pub id: String,

    /// Human-readable sequential display number (`INF-00001`), unique.
    pub bill_number: String,

    pub customer_id: String,

    /// Customer name at time of sale (frozen).
    pub customer_name: String,

    /// Customer contact at time of sale (frozen).
    pub customer_contact: String,

    /// When the sale happened.
    pub date: DateTime<Utc>,

    /// Line items in input order. Loaded separately from the bill row.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<BillItem>,

    /// Grand total in cents, the exact sum of line subtotals.
    pub total_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Bill Item Request
// =============================================================================

/// One requested line of a bill: which product and how many units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// Point-in-time aggregate counts, recomputed on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_customers: i64,
    pub total_categories: i64,
    pub total_bills: i64,
    /// Products with quantity below [`LOW_STOCK_THRESHOLD`].
    pub low_stock_products: i64,
    /// Sum of bill totals dated within the current UTC calendar day.
    pub today_sales_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
