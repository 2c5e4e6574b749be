//! Data structures for authentication-related entities.
//!
//! This module defines request and response payloads for the login,
//! registration and current-user endpoints, and the access-control role names.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::database::models::{Role, User};
use crate::utils::password::MAX_PASSWORD_BYTES;

/// Role names recognised by the route guards.
pub mod access_control {
    pub const CUSTOMER: &str = "CUSTOMER";

    /// Role assigned to every newly registered user
    pub const DEFAULT_ROLE: &str = CUSTOMER;
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(
            min = 1,
            max = 255,
            message = "Name must be between 1-255 characters"
        ),
        custom(function = "not_blank")
    )]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        custom(function = "fits_bcrypt")
    )]
    pub password: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message(Cow::from("Name must not be blank"))
        );
    }
    Ok(())
}

fn fits_bcrypt(value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("too_long").with_message(Cow::from(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        ))));
    }
    Ok(())
}

/// Response returned by login and registration
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Current user information, without the password hash
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_id: i64,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserInfo {
    pub fn new(user: User, role: Role) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role_id: role.id,
            role: role.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Lower-cases and trims an email address before it is stored or looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
