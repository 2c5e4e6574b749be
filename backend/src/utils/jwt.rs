//! JWT token utilities for authentication and authorization.
//!
//! Provides token creation, validation, and claims management. Tokens are
//! stateless: validity depends only on the signature and the expiry claim.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AuthConfig, MAX_JWT_EXPIRES_IN_SECONDS};
use crate::database::models::{Role, User};
use crate::errors::{ServiceError, ServiceResult};

/// JWT Claims structure: a snapshot of the user and role at issuance time
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub id: i64,
    /// Display name
    pub name: String,
    pub email: String,
    /// Role held when the token was issued
    pub role: RoleClaim,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RoleClaim {
    pub id: i64,
    pub name: String,
}

/// Why a token was rejected.
///
/// Both kinds surface as `ServiceError::InvalidToken`; the split only feeds logging.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed or its signature does not match: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for ServiceError {
    fn from(_: TokenError) -> Self {
        ServiceError::InvalidToken
    }
}

impl Claims {
    /// Builds claims for `user` holding `role`, valid for `lifetime` from `issued_at`.
    pub fn new(user: &User, role: &Role, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: RoleClaim {
                id: role.id,
                name: role.name.clone(),
            },
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.id
    }

    /// Exact, case-sensitive role match
    pub fn has_role(&self, role: &str) -> bool {
        self.role.name == role
    }
}

/// Issues and verifies HS256 tokens with a shared secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Fails when the configured lifetime is zero or above
    /// `MAX_JWT_EXPIRES_IN_SECONDS`.
    pub fn new(config: &AuthConfig) -> ServiceResult<Self> {
        let lifetime = Some(config.jwt_expires_in_seconds)
            .filter(|secs| (1..=MAX_JWT_EXPIRES_IN_SECONDS).contains(secs))
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                ServiceError::internal_error(format!(
                    "Token lifetime out of range: {} seconds",
                    config.jwt_expires_in_seconds
                ))
            })?;


        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(TokenIssuer {
            encoding_key,
            decoding_key,
            validation,
            lifetime,
        })
    }

    /// Generate a new token for `user` holding `role`, starting now
    pub fn issue(&self, user: &User, role: &Role) -> Result<String, ServiceError> {
        let claims = Claims::new(user, role, Utc::now(), self.lifetime);
        self.sign(&claims)
    }

    /// Sign prepared claims
    pub fn sign(&self, claims: &Claims) -> Result<String, ServiceError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a token
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing";

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_expires_in_seconds: 3600,
            bcrypt_cost: 4,
        })
        .unwrap()
    }

    fn customer() -> (User, Role) {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "test".to_string(),
            email: "tes@mail.com".to_string(),
            encrypted_password: String::new(),
            role_id: 1,
            created_at: now,
            updated_at: now,
        };
        let role = Role {
            id: 1,
            name: "CUSTOMER".to_string(),
        };
        (user, role)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = issuer(TEST_SECRET);
        let (user, role) = customer();
        let claims = Claims::new(&user, &role, Utc::now(), Duration::minutes(5));

        let token = tokens.sign(&claims).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_issue_uses_configured_lifetime() {
        let tokens = issuer(TEST_SECRET);
        let (user, role) = customer();

        let claims = tokens.verify(&tokens.issue(&user, &role).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.role.name, "CUSTOMER");
        assert_eq!(claims.user_id(), 1);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_lifetime_out_of_range_rejected() {
        for secs in [0, MAX_JWT_EXPIRES_IN_SECONDS + 1, 10_000_000_000_000_000, u64::MAX] {
            let result = TokenIssuer::new(&AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                jwt_expires_in_seconds: secs,
                bcrypt_cost: 4,
            });
            assert!(result.is_err(), "lifetime {secs} should be rejected");
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = issuer(TEST_SECRET);
        let (user, role) = customer();
        let issued_at = Utc::now() - Duration::hours(2);
        let claims = Claims::new(&user, &role, issued_at, Duration::hours(1));
        assert!(claims.exp < Utc::now().timestamp());

        let token = tokens.sign(&claims).unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = issuer(TEST_SECRET);
        let (user, role) = customer();
        let token = tokens.issue(&user, &role).unwrap();

        // Swap the payload for one claiming ADMIN, keeping the original signature.
        let mut admin_role = role.clone();
        admin_role.name = "ADMIN".to_string();
        let forged = tokens.issue(&user, &admin_role).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(
            tokens.verify(&tampered),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_and_garbage_rejected() {
        let (user, role) = customer();
        let token = issuer(TEST_SECRET).issue(&user, &role).unwrap();

        assert!(issuer("another-secret").verify(&token).is_err());
        assert!(issuer(TEST_SECRET).verify("invalid.token.here").is_err());
        assert!(issuer(TEST_SECRET).verify("").is_err());
    }

    #[test]
    fn test_has_role_is_exact() {
        let (user, role) = customer();
        let claims = Claims::new(&user, &role, Utc::now(), Duration::minutes(1));

        assert!(claims.has_role("CUSTOMER"));
        assert!(!claims.has_role("customer"));
        assert!(!claims.has_role("ADMIN"));
    }

    #[test]
    fn test_token_error_maps_to_invalid_token() {
        let err: ServiceError = TokenError::Expired.into();
        assert!(matches!(err, ServiceError::InvalidToken));
    }
}
