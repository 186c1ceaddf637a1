//! # Reports Repository
//!
//! Dashboard aggregates. Everything is recomputed per request; nothing is
//! cached or pre-aggregated. At single-store volumes the COUNT queries are
//! effectively free.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use infinity_core::{DashboardStats, LOW_STOCK_THRESHOLD};

/// Repository for dashboard statistics.
#[derive(Debug, Clone)]
pub struct ReportsRepository {
    pool: SqlitePool,
}

impl ReportsRepository {
    /// Creates a new ReportsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportsRepository { pool }
    }

    /// Computes the full dashboard snapshot.
    ///
    /// "Today" is the current UTC calendar day; its boundary is computed
    /// fresh on every call.
    pub async fn dashboard_stats(&self) -> DbResult<DashboardStats> {
        let total_products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        let total_bills: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;

        let low_stock_products: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE quantity < ?1")
                .bind(LOW_STOCK_THRESHOLD)
                .fetch_one(&self.pool)
                .await?;

        let (day_start, day_end) = today_bounds();
        let today_sales_cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0)
            FROM bills
            WHERE date >= ?1 AND date < ?2
            "#,
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            total_products,
            total_bills, today_sales_cents, "Computed dashboard stats"
        );

        Ok(DashboardStats {
            total_products,
            total_customers,
            total_categories,
            total_bills,
            low_stock_products,
            today_sales_cents,
        })
    }
}

/// Half-open [start, end) bounds of the current UTC calendar day.
fn today_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN);
    let start = DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc);
    (start, start + Duration::days(1))
}

// =============================================================================
// Unit Tests
// =============================================================================
