//! # Billing Math
//!
//! Pure calculations for the bill creation workflow: stock checks, line
//! snapshots, running totals and bill number formatting. The persistence
//! layer drives these functions inside a single transaction.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bill Creation (per line, in order)                  │
//! │                                                                         │
//! │  resolve product                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check_stock(product, requested) ← THIS MODULE                          │
//! │       │                                                                 │
//! │       ├── available < requested → InsufficientStock                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_item(product, requested) ← snapshot name/price, compute subtotal │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  conditional stock decrement (infinity-db)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total += subtotal; next line sees the decremented stock                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BillItem, Product};
use crate::{BILL_NUMBER_PREFIX, BILL_NUMBER_WIDTH};

/// Verifies that a product has enough stock for the requested quantity.
///
/// ## Example
/// ```rust,ignore
/// check_stock(&product, 2)?; // Err(InsufficientStock) if quantity < 2
/// ```
pub fn check_stock(product: &Product, requested: i64) -> CoreResult<()> {
    if product.in_stock(requested) {
        return Ok(());
    }

    Err(CoreError::InsufficientStock {
        product: product.name.clone(),
        available: product.quantity,
        requested,
    })
}

/// Computes a line subtotal (`unit_price × quantity`) in integer cents.
#[inline]
pub fn line_subtotal(unit_price: Money, quantity: i64) -> Money {
    unit_price.multiply_quantity(quantity)
}

/// Builds a bill line snapshot from the product's current name and price.
///
/// Later product edits never retroactively change the snapshot.
pub fn build_item(product: &Product, quantity: i64) -> BillItem {
    let subtotal = line_subtotal(product.price(), quantity);

    BillItem {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        unit_price_cents: product.price_cents,
        subtotal_cents: subtotal.cents(),
    }
}

/// Sums line subtotals into the bill's grand total.
pub fn bill_total(items: &[BillItem]) -> Money {
    items.iter().map(BillItem::subtotal).sum()
}

/// Formats a bill number from its 1-based ordinal: `INF-00007`.
///
/// The ordinal comes from the count of existing bills plus one, computed
/// inside the same transaction that inserts the bill so that sequential
/// creation yields unique numbers.
pub fn format_bill_number(ordinal: i64) -> String {
    format!("{}-{:0width$}", BILL_NUMBER_PREFIX, ordinal, width = BILL_NUMBER_WIDTH)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price_cents: i64, quantity: i64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Mathematics Textbook Grade 10".to_string(),
            category_id: "c1".to_string(),
            category_name: "School Books".to_string(),
            price_cents,
            quantity,
            image_url: String::new(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_check_stock_ok_at_boundary() {
        let p = product(85_000, 2);
        assert!(check_stock(&p, 2).is_ok());
    }

    #[test]
    fn test_check_stock_insufficient() {
        let p = product(85_000, 1);
        let err = check_stock(&p, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_build_item_snapshots_and_subtotal() {
        let p = product(85_000, 50);
        let item = build_item(&p, 2);

        assert_eq!(item.product_id, "p1");
        assert_eq!(item.product_name, "Mathematics Textbook Grade 10");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price_cents, 85_000);
        // 850.00 × 2 = 1700.00 exactly
        assert_eq!(item.subtotal_cents, 170_000);
    }

    #[test]
    fn test_bill_total_is_exact_sum() {
        let items = vec![
            build_item(&product(85_000, 50), 2),
            build_item(&product(20_000, 100), 3),
        ];
        assert_eq!(bill_total(&items).cents(), 170_000 + 60_000);
    }

    #[test]
    fn test_bill_total_empty() {
        assert_eq!(bill_total(&[]).cents(), 0);
    }

    #[test]
    fn test_format_bill_number() {
        assert_eq!(format_bill_number(1), "INF-00001");
        assert_eq!(format_bill_number(7), "INF-00007");
        assert_eq!(format_bill_number(99_999), "INF-99999");
        // Past the padded width the number keeps growing rather than wrapping
        assert_eq!(format_bill_number(123_456), "INF-123456");
    }
}
