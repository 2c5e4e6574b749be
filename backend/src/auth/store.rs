//! Credential store abstraction over user and role persistence.
//!
//! The authentication flows only need a handful of lookups and one insert,
//! expressed by [`CredentialStore`]. [`SqliteCredentialStore`] implements it
//! on top of the SQLite repositories.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{CreateUser, Role, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::{UserRepository, is_unique_violation};

/// Persistence operations the authentication flows depend on.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>>;

    async fn find_user_by_id(&self, id: i64) -> ServiceResult<Option<User>>;

    async fn find_role_by_id(&self, id: i64) -> ServiceResult<Option<Role>>;

    async fn find_role_by_name(&self, name: &str) -> ServiceResult<Option<Role>>;

    /// Inserts a user. Fails with `EmailAlreadyTaken` when the store's
    /// uniqueness constraint on email is violated.
    async fn create_user(&self, user: CreateUser) -> ServiceResult<User>;
}

#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(UserRepository::new(&self.pool)
            .get_user_by_email(email)
            .await?)
    }

    async fn find_user_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        Ok(UserRepository::new(&self.pool).get_user_by_id(id).await?)
    }

    async fn find_role_by_id(&self, id: i64) -> ServiceResult<Option<Role>> {
        Ok(RoleRepository::new(&self.pool).get_role_by_id(id).await?)
    }

    async fn find_role_by_name(&self, name: &str) -> ServiceResult<Option<Role>> {
        Ok(RoleRepository::new(&self.pool)
            .get_role_by_name(name)
            .await?)
    }

    async fn create_user(&self, user: CreateUser) -> ServiceResult<User> {
        let email = user.email.clone();
        UserRepository::new(&self.pool)
            .create_user(user)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::email_already_taken(email)
                } else {
                    ServiceError::from(e)
                }
            })
    }
}

#[cfg(test)]
pub mod test_support {
    //! In-memory stores for exercising the flows without a database.

    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    pub struct InMemoryCredentialStore {
        roles: Vec<Role>,
        users: Mutex<Vec<User>>,
    }

    impl InMemoryCredentialStore {
        /// Store seeded with the CUSTOMER (id 1) and ADMIN (id 2) roles.
        pub fn new() -> Self {
            Self::with_roles(vec![
                Role {
                    id: 1,
                    name: "CUSTOMER".to_string(),
                },
                Role {
                    id: 2,
                    name: "ADMIN".to_string(),
                },
            ])
        }

        pub fn with_roles(roles: Vec<Role>) -> Self {
            Self {
                roles,
                users: Mutex::new(Vec::new()),
            }
        }

        pub fn user_count(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn find_role_by_id(&self, id: i64) -> ServiceResult<Option<Role>> {
            Ok(self.roles.iter().find(|r| r.id == id).cloned())
        }

        async fn find_role_by_name(&self, name: &str) -> ServiceResult<Option<Role>> {
            Ok(self.roles.iter().find(|r| r.name == name).cloned())
        }

        async fn create_user(&self, user: CreateUser) -> ServiceResult<User> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(ServiceError::email_already_taken(user.email));
            }

            let now = Utc::now();
            let created = User {
                id: users.len() as i64 + 1,
                name: user.name,
                email: user.email,
                encrypted_password: user.encrypted_password,
                role_id: user.role_id,
                created_at: now,
                updated_at: now,
            };
            users.push(created.clone());
            Ok(created)
        }
    }

    /// Store whose every call fails as a storage outage would.
    pub struct FailingCredentialStore;

    fn outage() -> ServiceError {
        ServiceError::from(anyhow::anyhow!("connection refused"))
    }

    #[async_trait]
    impl CredentialStore for FailingCredentialStore {
        async fn find_user_by_email(&self, _email: &str) -> ServiceResult<Option<User>> {
            Err(outage())
        }

        async fn find_user_by_id(&self, _id: i64) -> ServiceResult<Option<User>> {
            Err(outage())
        }

        async fn find_role_by_id(&self, _id: i64) -> ServiceResult<Option<Role>> {
            Err(outage())
        }

        async fn find_role_by_name(&self, _name: &str) -> ServiceResult<Option<Role>> {
            Err(outage())
        }

        async fn create_user(&self, _user: CreateUser) -> ServiceResult<User> {
            Err(outage())
        }
    }
}
