//! Database repository for role management operations.
//!
//! Provides read-only access to system roles with:
//! - Role lookup by ID or name
//! - Complete role listing
use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::Role;

/// Repository for role database operations.
///
/// Roles are reference data seeded by migration, so only reads are exposed.
pub struct RoleRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> RoleRepository<'a> {
    /// Creates a new RoleRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves a role by its unique identifier.
    ///
    /// # Returns
    /// `Some(Role)` if found, `None` otherwise
    pub async fn get_role_by_id(&self, id: i64) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(role)
    }

    /// Retrieves a role by its exact name.
    ///
    /// # Use Case
    /// Resolving the default role assigned on registration
    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool)
            .await?;

        Ok(role)
    }
}
