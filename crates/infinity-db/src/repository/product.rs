//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Read-Time Category Join
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                How category_name Stays Fresh                            │
//! │                                                                         │
//! │  Write path: product stores a snapshot of the category name            │
//! │       products.category_name = "Stationery"                            │
//! │                                                                         │
//! │  Category renamed: "Stationery" → "Office Supplies"                    │
//! │       (product rows are NOT touched)                                   │
//! │                                                                         │
//! │  Read path: list() joins against current categories                    │
//! │       COALESCE(c.name, p.category_name)                                │
//! │       │                                                                 │
//! │       ├── Category still exists → current name wins                    │
//! │       └── Category gone        → stored snapshot as fallback           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use infinity_core::Product;

/// Columns selected for the read-time join. The current category name wins
/// over the stored snapshot when the category still exists.
const SELECT_JOINED: &str = r#"
    SELECT
        p.id,
        p.name,
        p.category_id,
        COALESCE(c.name, p.category_name) AS category_name,
        p.price_cents,
        p.quantity,
        p.image_url,
        p.description,
        p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let products = repo.list().await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products in insertion order, with category names resolved
    /// against the current categories table.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("{SELECT_JOINED} ORDER BY p.created_at");

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_JOINED} WHERE p.id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category_id, category_name,
                price_cents, quantity, image_url, description, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(&product.category_name)
        .bind(product.price_cents)
        .bind(product.quantity)
        .bind(&product.image_url)
        .bind(&product.description)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product (full row except id and created_at).
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category_id = ?3,
                category_name = ?4,
                price_cents = ?5,
                quantity = ?6,
                image_url = ?7,
                description = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(&product.category_name)
        .bind(product.price_cents)
        .bind(product.quantity)
        .bind(&product.image_url)
        .bind(&product.description)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Historical bill items keep their snapshots, so hard delete is safe.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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
    use crate::repository::generate_id;
    use chrono::Utc;
    use infinity_core::Category;

    async fn seed_category(db: &Database, name: &str) -> Category {
        let cat = Category {
            id: generate_id(),
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now(),
        };
        db.categories().insert(&cat).await.unwrap();
        cat
    }

    fn sample_product(category: &Category, name: &str, quantity: i64) -> Product {
        Product {
            id: generate_id(),
            name: name.to_string(),
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            price_cents: 85_000,
            quantity,
            image_url: "https://example.com/img.jpg".to_string(),
            description: "A product".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cat = seed_category(&db, "Stationery").await;

        let product = sample_product(&cat, "Notebook", 50);
        db.products().insert(&product).await.unwrap();

        let listed = db.products().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Notebook");
        assert_eq!(listed[0].category_name, "Stationery");
    }

    #[tokio::test]
    async fn test_category_rename_reflected_at_read_time() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut cat = seed_category(&db, "Stationery").await;

        let product = sample_product(&cat, "Notebook", 50);
        db.products().insert(&product).await.unwrap();

        cat.name = "Office Supplies".to_string();
        db.categories().update(&cat).await.unwrap();

        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.category_name, "Office Supplies");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cat = seed_category(&db, "Stationery").await;

        let mut product = sample_product(&cat, "Notebook", 50);
        db.products().insert(&product).await.unwrap();

        product.price_cents = 95_000;
        product.quantity = 40;
        db.products().update(&product).await.unwrap();

        let fetched = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.price_cents, 95_000);
        assert_eq!(fetched.quantity, 40);

        db.products().delete(&product.id).await.unwrap();
        assert!(db.products().get_by_id(&product.id).await.unwrap().is_none());

        let err = db.products().delete(&product.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
