//! Dashboard route.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use infinity_core::{DashboardStats, Money};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

/// Wire view of dashboard stats, sales in major units.
#[derive(Debug, Serialize)]
pub struct DashboardStatsView {
    pub total_products: i64,
    pub total_customers: i64,
    pub total_categories: i64,
    pub total_bills: i64,
    pub low_stock_products: i64,
    pub today_sales: f64,
}

impl From<DashboardStats> for DashboardStatsView {
    fn from(stats: DashboardStats) -> Self {
        DashboardStatsView {
            total_products: stats.total_products,
            total_customers: stats.total_customers,
            total_categories: stats.total_categories,
            total_bills: stats.total_bills,
            low_stock_products: stats.low_stock_products,
            today_sales: Money::from_cents(stats.today_sales_cents).as_major_units(),
        }
    }
}

/// GET /dashboard/stats
pub async fn stats(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<DashboardStatsView>> {
    let stats = state.db.reports().dashboard_stats().await?;
    Ok(Json(stats.into()))
}
