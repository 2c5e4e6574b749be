//! Core business logic for the authentication system.

use std::sync::Arc;

use crate::auth::models::*;
use crate::auth::store::CredentialStore;
use crate::database::models::{CreateUser, Role, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::jwt::{Claims, TokenIssuer};
use crate::utils::password::PasswordHasher;
use validator::Validate;

/// Authentication service for handling login, registration and current-user lookups
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        AuthService {
            store,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    /// Authenticate a user by email and password and issue an access token
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AccessTokenResponse> {
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let email = normalize_email(&request.email);
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::email_not_registered(&email))?;

        if !self.hasher.verify(&request.password, &user.encrypted_password) {
            tracing::warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(ServiceError::WrongPassword);
        }

        let role = self.role_of(&user).await?;
        let access_token = self.tokens.issue(&user, &role)?;

        tracing::info!(user_id = user.id, role = %role.name, "User logged in");
        Ok(AccessTokenResponse { access_token })
    }

    /// Register a new user with the default role and issue an access token.
    ///
    /// Nothing is created when the email is already registered.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AccessTokenResponse> {
        request
            .validate()
            .map_err(ServiceError::from_validation_errors)?;

        let email = normalize_email(&request.email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::email_already_taken(email));
        }

        let role = self
            .store
            .find_role_by_name(access_control::DEFAULT_ROLE)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", access_control::DEFAULT_ROLE))?;

        let encrypted_password = self.hasher.hash(&request.password)?;

        // The store's unique index still guards against a concurrent registration.
        let user = self
            .store
            .create_user(CreateUser {
                name: request.name.trim().to_string(),
                email,
                encrypted_password,
                role_id: role.id,
            })
            .await?;

        let access_token = self.tokens.issue(&user, &role)?;

        tracing::info!(user_id = user.id, role = %role.name, "User registered");
        Ok(AccessTokenResponse { access_token })
    }

    /// Load the user identified by verified token claims
    pub async fn current_user(&self, claims: &Claims) -> ServiceResult<UserInfo> {
        let user = self
            .store
            .find_user_by_id(claims.user_id())
            .await?
            .ok_or_else(|| ServiceError::not_found("User", claims.user_id()))?;

        let role = self.role_of(&user).await?;
        Ok(UserInfo::new(user, role))
    }

    async fn role_of(&self, user: &User) -> ServiceResult<Role> {
        self.store
            .find_role_by_id(user.role_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", user.role_id))
    }
}
