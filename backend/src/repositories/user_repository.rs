//! Database repository for user management operations.
//!
//! Provides creation and lookup of system users. Users are never deleted.

use crate::database::models::{CreateUser, User};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, name, email, encrypted_password, role_id, created_at, updated_at";

/// Repository for user database operations.
///
/// Handles all persistence operations for the User entity,
/// maintaining the relationship with roles.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO containing user details
    ///
    /// # Returns
    /// The newly created User with all fields populated
    ///
    /// # Errors
    /// Fails with the underlying `sqlx::Error` (wrapped) when the email is
    /// already present, via the unique index on `users.email`.
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (name, email, encrypted_password, role_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user.name)
            .bind(user.email)
            .bind(user.encrypted_password)
            .bind(user.role_id)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by email address.
    ///
    /// # Arguments
    /// * `email` - Normalized (lower-case) email to search for
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }
}

/// True when the error chain holds a unique-constraint violation from the database.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
