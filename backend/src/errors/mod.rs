//! Global application error types.
//!
//! This module defines the error taxonomy used across the backend. Every
//! variant carries a stable name, a human-readable message (its `Display`)
//! and optional structured details. The HTTP mapping lives in
//! `api::common`.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Field-specific validation error details
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Authorization token is missing")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Access forbidden!")]
    InsufficientAccess { role: String },

    #[error("{email} is not registered!")]
    EmailNotRegistered { email: String },

    #[error("Password is not correct!")]
    WrongPassword,

    #[error("{email} is already taken!")]
    EmailAlreadyTaken { email: String },

    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("Not found!")]
    RouteNotFound { method: String, url: String },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
    },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn not_found(entity: impl Into<String>, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.to_string(),
        }
    }

    pub fn insufficient_access(role: impl Into<String>) -> Self {
        Self::InsufficientAccess { role: role.into() }
    }

    pub fn email_not_registered(email: impl Into<String>) -> Self {
        Self::EmailNotRegistered {
            email: email.into(),
        }
    }

    pub fn email_already_taken(email: impl Into<String>) -> Self {
        Self::EmailAlreadyTaken {
            email: email.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Builds a validation error from `validator` output, keeping per-field details.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        let message = fields
            .iter()
            .map(|f| format!("{}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join(", ");

        Self::Validation { message, fields }
    }

    /// Stable, machine-readable error name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingToken => "MissingTokenError",
            Self::InvalidToken => "InvalidTokenError",
            Self::InsufficientAccess { .. } => "InsufficientAccessError",
            Self::EmailNotRegistered { .. } => "EmailNotRegisteredError",
            Self::WrongPassword => "WrongPasswordError",
            Self::EmailAlreadyTaken { .. } => "EmailAlreadyTakenError",
            Self::NotFound { .. } => "RecordNotFoundError",
            Self::RouteNotFound { .. } => "NotFoundError",
            Self::Validation { .. } => "ValidationError",
            Self::Database { .. } | Self::InternalError { .. } => "InternalServerError",
        }
    }

    /// Structured details attached to the error, if any.
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::InsufficientAccess { role } => Some(json!({
                "role": role,
                "reason": format!("{role} is not allowed to perform this operation."),
            })),
            Self::EmailNotRegistered { email } | Self::EmailAlreadyTaken { email } => {
                Some(json!({ "email": email }))
            }
            Self::NotFound { entity, identifier } => Some(json!({
                "entity": entity,
                "identifier": identifier,
            })),
            Self::RouteNotFound { method, url } => Some(json!({
                "method": method,
                "url": url,
            })),
            Self::Validation { fields, .. } if !fields.is_empty() => Some(json!(fields)),
            _ => None,
        }
    }

    /// True for failures that are not part of the domain taxonomy.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Database { .. } | Self::InternalError { .. })
    }
}
