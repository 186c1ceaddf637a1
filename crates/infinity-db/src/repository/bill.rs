//! # Bill Repository
//!
//! Transactional bill creation plus bill listing and lookup.
//!
//! ## Bill Creation Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Atomic Bill Creation                                 │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │       │                                                                 │
//! │       ▼  for each requested line, in input order:                      │
//! │  ┌─────────────────────────────────────────────┐                       │
//! │  │ 1. Fetch product          (missing → 404)   │                       │
//! │  │ 2. Check stock            (short → error)   │                       │
//! │  │ 3. Conditional decrement:                   │                       │
//! │  │    UPDATE products                          │                       │
//! │  │    SET quantity = quantity - ?qty           │                       │
//! │  │    WHERE id = ? AND quantity >= ?qty        │                       │
//! │  │    (0 rows → concurrent sale won, error)    │                       │
//! │  │ 4. Snapshot name/price into a line item     │                       │
//! │  └─────────────────────────────────────────────┘                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Number the bill: COUNT(bills) + 1 → INF-00042                         │
//! │  Insert bill row + line item rows                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT  (any failure above rolls everything back:                     │
//! │           no bill, no partial stock decrements)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use infinity_core::billing;
use infinity_core::{Bill, BillItem, BillItemRequest, Customer, Product};

/// Line item row as stored, carrying its owning bill id for grouping.
#[derive(Debug, sqlx::FromRow)]
struct BillItemRow {
    bill_id: String,
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
}

impl From<BillItemRow> for BillItem {
    fn from(row: BillItemRow) -> Self {
        BillItem {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            subtotal_cents: row.subtotal_cents,
        }
    }
}

/// Repository for bill database operations.
///
/// Bills are immutable: there is no update or delete.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Creates a bill atomically: stock decrements, numbering, and the
    /// bill rows all land in one transaction.
    ///
    /// ## Arguments
    /// * `customer` - The customer being billed (name/contact snapshotted)
    /// * `lines` - Requested product/quantity pairs, in display order
    ///
    /// ## Returns
    /// * `Ok(Bill)` - The complete bill as stored
    /// * `Err(DbError::NotFound)` - A referenced product doesn't exist
    /// * `Err(DbError::Domain(InsufficientStock))` - A line can't be
    ///   fulfilled; nothing is committed
    pub async fn create(&self, customer: &Customer, lines: &[BillItemRequest]) -> DbResult<Bill> {
        debug!(customer = %customer.name, lines = lines.len(), "Creating bill");

        let mut tx = self.pool.begin().await?;

        let now = Utc::now();
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, category_id, category_name,
                       price_cents, quantity, image_url, description, created_at
                FROM products
                WHERE id = ?1
                "#,
            )
            .bind(&line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &line.product_id))?;

            // Friendly check first so the error carries the available count.
            billing::check_stock(&product, line.quantity)?;

            // Conditional decrement guards against a concurrent sale that
            // drained the stock between the read above and this write.
            let result = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - ?1
                WHERE id = ?2 AND quantity >= ?1
                "#,
            )
            .bind(line.quantity)
            .bind(&product.id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(infinity_core::CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.quantity,
                    requested: line.quantity,
                }
                .into());
            }

            items.push(billing::build_item(&product, line.quantity));
        }

        // Numbering inside the transaction keeps the count and the insert
        // consistent under concurrent bill creation.
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&mut *tx)
            .await?;
        let bill_number = billing::format_bill_number(existing + 1);

        let total = billing::bill_total(&items);

        let bill = Bill {
            id: generate_id(),
            bill_number,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_contact: customer.contact.clone(),
            date: now,
            items,
            total_cents: total.cents(),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO bills (
                id, bill_number, customer_id, customer_name, customer_contact,
                date, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&bill.id)
        .bind(&bill.bill_number)
        .bind(&bill.customer_id)
        .bind(&bill.customer_name)
        .bind(&bill.customer_contact)
        .bind(bill.date)
        .bind(bill.total_cents)
        .bind(bill.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in bill.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO bill_items (
                    id, bill_id, position, product_id, product_name,
                    quantity, unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(generate_id())
            .bind(&bill.id)
            .bind(position as i64)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.subtotal_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(bill_number = %bill.bill_number, total_cents = bill.total_cents, "Bill created");
        Ok(bill)
    }

    /// Lists all bills, newest first, with line items attached.
    pub async fn list(&self) -> DbResult<Vec<Bill>> {
        let mut bills = sqlx::query_as::<_, Bill>(
            r#"
            SELECT id, bill_number, customer_id, customer_name, customer_contact,
                   date, total_cents, created_at
            FROM bills
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        if bills.is_empty() {
            return Ok(bills);
        }

        // One query for all items, grouped in memory. Bill counts here are
        // small enough that this beats N+1 lookups.
        let rows = sqlx::query_as::<_, BillItemRow>(
            r#"
            SELECT bill_id, product_id, product_name,
                   quantity, unit_price_cents, subtotal_cents
            FROM bill_items
            ORDER BY bill_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        for bill in &mut bills {
            bill.items = rows
                .iter()
                .filter(|row| row.bill_id == bill.id)
                .map(|row| BillItem {
                    product_id: row.product_id.clone(),
                    product_name: row.product_name.clone(),
                    quantity: row.quantity,
                    unit_price_cents: row.unit_price_cents,
                    subtotal_cents: row.subtotal_cents,
                })
                .collect();
        }

        Ok(bills)
    }

    /// Gets a single bill with its line items.
    ///
    /// ## Returns
    /// * `Ok(Some(Bill))` - Bill found
    /// * `Ok(None)` - No bill with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT id, bill_number, customer_id, customer_name, customer_contact,
                   date, total_cents, created_at
            FROM bills
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut bill) = bill else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, BillItemRow>(
            r#"
            SELECT bill_id, product_id, product_name,
                   quantity, unit_price_cents, subtotal_cents
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        bill.items = rows.into_iter().map(BillItem::from).collect();

        Ok(Some(bill))
    }

    /// Counts total bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use infinity_core::{Category, CoreError};

    async fn seed(db: &Database) -> (Customer, Product, Product) {
        let cat = Category {
            id: generate_id(),
            name: "Stationery".to_string(),
            description: String::new(),
            created_at: Utc::now(),
        };
        db.categories().insert(&cat).await.unwrap();

        let notebook = Product {
            id: generate_id(),
            name: "Notebook".to_string(),
            category_id: cat.id.clone(),
            category_name: cat.name.clone(),
            price_cents: 85_000,
            quantity: 10,
            image_url: String::new(),
            description: String::new(),
            created_at: Utc::now(),
        };
        db.products().insert(&notebook).await.unwrap();

        let pen = Product {
            id: generate_id(),
            name: "Ballpoint Pen".to_string(),
            category_id: cat.id,
            category_name: cat.name,
            price_cents: 5_000,
            quantity: 3,
            image_url: String::new(),
            description: String::new(),
            created_at: Utc::now(),
        };
        db.products().insert(&pen).await.unwrap();

        let customer = Customer {
            id: generate_id(),
            name: "Ahmed Ali".to_string(),
            contact: "0300-1234567".to_string(),
            email: String::new(),
            address: String::new(),
            created_at: Utc::now(),
        };
        db.customers().insert(&customer).await.unwrap();

        (customer, notebook, pen)
    }

    #[tokio::test]
    async fn test_create_bill_decrements_stock_and_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customer, notebook, _) = seed(&db).await;

        let lines = vec![BillItemRequest {
            product_id: notebook.id.clone(),
            quantity: 2,
        }];

        let bill = db.bills().create(&customer, &lines).await.unwrap();

        assert_eq!(bill.bill_number, "INF-00001");
        assert_eq!(bill.total_cents, 170_000);
        assert_eq!(bill.items.len(), 1);
        assert_eq!(bill.items[0].product_name, "Notebook");
        assert_eq!(bill.items[0].subtotal_cents, 170_000);
        assert_eq!(bill.customer_name, "Ahmed Ali");

        let remaining = db.products().get_by_id(&notebook.id).await.unwrap().unwrap();
        assert_eq!(remaining.quantity, 8);
    }

    #[tokio::test]
    async fn test_bill_numbers_are_sequential() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customer, notebook, _) = seed(&db).await;

        let lines = vec![BillItemRequest {
            product_id: notebook.id,
            quantity: 1,
        }];

        let first = db.bills().create(&customer, &lines).await.unwrap();
        let second = db.bills().create(&customer, &lines).await.unwrap();

        assert_eq!(first.bill_number, "INF-00001");
        assert_eq!(second.bill_number, "INF-00002");
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customer, notebook, pen) = seed(&db).await;

        // First line is fine, second asks for more pens than exist.
        let lines = vec![
            BillItemRequest {
                product_id: notebook.id.clone(),
                quantity: 2,
            },
            BillItemRequest {
                product_id: pen.id.clone(),
                quantity: 5,
            },
        ];

        let err = db.bills().create(&customer, &lines).await.unwrap_err();
        match err {
            DbError::Domain(CoreError::InsufficientStock {
                product, available, ..
            }) => {
                assert_eq!(product, "Ballpoint Pen");
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Rollback: no bill, and the first line's decrement undone.
        assert_eq!(db.bills().count().await.unwrap(), 0);
        let nb = db.products().get_by_id(&notebook.id).await.unwrap().unwrap();
        assert_eq!(nb.quantity, 10);
    }

    #[tokio::test]
    async fn test_missing_product_fails_creation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customer, _, _) = seed(&db).await;

        let lines = vec![BillItemRequest {
            product_id: "no-such-product".to_string(),
            quantity: 1,
        }];

        let err = db.bills().create(&customer, &lines).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_and_get_preserve_item_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (customer, notebook, pen) = seed(&db).await;

        let lines = vec![
            BillItemRequest {
                product_id: pen.id,
                quantity: 1,
            },
            BillItemRequest {
                product_id: notebook.id,
                quantity: 1,
            },
        ];

        let created = db.bills().create(&customer, &lines).await.unwrap();

        let listed = db.bills().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].items[0].product_name, "Ballpoint Pen");
        assert_eq!(listed[0].items[1].product_name, "Notebook");

        let fetched = db.bills().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.total_cents, created.total_cents);
    }
}
