//! # User Repository
//!
//! Database operations for operator accounts.
//!
//! Passwords are hashed before they reach this layer; this repository only
//! ever sees and stores the hash.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use infinity_core::User;

/// Repository for user account operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = UserRepository::new(pool);
/// let user = repo.get_by_username("admin").await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by username.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that name
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a new user account.
    ///
    /// ## Returns
    /// * `Ok(())` - User created
    /// * `Err(DbError::UniqueViolation)` - Username already taken
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Checks whether a username is already taken.
    pub async fn username_exists(&self, username: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Counts registered users (used to decide whether demo seeding
    /// should create the default admin).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes a user by id. Unused by the HTTP surface today but handy
    /// for test cleanup.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
