//! Password hashing backed by bcrypt.
//!
//! Hashes embed their own salt and cost, so verification needs only the
//! stored string. Plaintext passwords are never logged.

use crate::errors::{FieldError, ServiceError, ServiceResult};

/// bcrypt ignores every byte past this length.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// `cost` is the bcrypt work factor (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are rejected rather than
    /// silently truncated.
    pub fn hash(&self, password: &str) -> ServiceResult<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(ServiceError::Validation {
                message: format!("password: Password must be at most {MAX_PASSWORD_BYTES} bytes"),
                fields: vec![FieldError {
                    field: "password".to_string(),
                    message: format!("Password must be at most {MAX_PASSWORD_BYTES} bytes"),
                }],
            });
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against the stored hash.
    ///
    /// A stored value that is not a bcrypt hash never matches, and neither
    /// does a password too long to have been hashed.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}
