//! Middleware for protecting authenticated routes and handling authorization.
//!
//! A [`RoleGuard`] is bound to one required role when the route is declared.
//! Per request it extracts the bearer token, verifies it, and compares the
//! role carried in the token against the required role. On success the
//! decoded [`Claims`] are attached to the request extensions for handlers.

use std::sync::Arc;

use crate::errors::{ServiceError, ServiceResult};
use crate::utils::jwt::{Claims, TokenError, TokenIssuer};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Route guard admitting only tokens whose role equals `required_role`.
#[derive(Clone)]
pub struct RoleGuard {
    tokens: Arc<TokenIssuer>,
    required_role: Arc<str>,
}

impl RoleGuard {
    pub fn new(tokens: Arc<TokenIssuer>, required_role: &str) -> Self {
        Self {
            tokens,
            required_role: Arc::from(required_role),
        }
    }

    /// Runs the guard against request headers.
    ///
    /// The role is only compared once the token has been found and verified.
    pub fn check(&self, headers: &HeaderMap) -> ServiceResult<Claims> {
        let token = bearer_token(headers).ok_or(ServiceError::MissingToken)?;

        let claims = self.tokens.verify(token).map_err(|e| {
            match &e {
                TokenError::Expired => tracing::debug!("Rejected expired token"),
                TokenError::Invalid(reason) => tracing::debug!("Rejected token: {}", reason),
            }
            ServiceError::from(e)
        })?;

        if !claims.has_role(&self.required_role) {
            tracing::warn!(
                user_id = claims.id,
                role = %claims.role.name,
                required = %self.required_role,
                "Insufficient access"
            );
            return Err(ServiceError::insufficient_access(claims.role.name));
        }

        Ok(claims)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Role authorization middleware, used with `middleware::from_fn_with_state`
pub async fn authorize(
    State(guard): State<RoleGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let claims = guard.check(request.headers())?;

    // Add claims to request extensions for use in handlers
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::database::models::{Role, User};
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    fn issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(&AuthConfig {
            jwt_secret: "guard-test-secret".to_string(),
            jwt_expires_in_seconds: 600,
            bcrypt_cost: 4,
        })
        .unwrap())
    }

    fn token_for(tokens: &TokenIssuer, role_name: &str) -> String {
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
            name: role_name.to_string(),
        };
        tokens.issue(&user, &role).unwrap()
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_matching_role_allowed() {
        let tokens = issuer();
        let guard = RoleGuard::new(tokens.clone(), "CUSTOMER");
        let headers = headers_with(&format!("Bearer {}", token_for(&tokens, "CUSTOMER")));

        let claims = guard.check(&headers).unwrap();
        assert_eq!(claims.id, 1);
        assert_eq!(claims.role.name, "CUSTOMER");
    }

    #[test]
    fn test_other_role_rejected_with_actual_role() {
        let tokens = issuer();
        let guard = RoleGuard::new(tokens.clone(), "ADMIN");
        let headers = headers_with(&format!("Bearer {}", token_for(&tokens, "CUSTOMER")));

        let err = guard.check(&headers).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InsufficientAccess { ref role } if role == "CUSTOMER"
        ));
    }

    #[test]
    fn test_missing_header_rejected_before_role_check() {
        let guard = RoleGuard::new(issuer(), "ADMIN");

        assert!(matches!(
            guard.check(&HeaderMap::new()),
            Err(ServiceError::MissingToken)
        ));
        assert!(matches!(
            guard.check(&headers_with("Token abc")),
            Err(ServiceError::MissingToken)
        ));
    }

    #[test]
    fn test_invalid_and_expired_tokens_rejected() {
        let tokens = issuer();
        let guard = RoleGuard::new(tokens.clone(), "CUSTOMER");

        assert!(matches!(
            guard.check(&headers_with("Bearer not.a.token")),
            Err(ServiceError::InvalidToken)
        ));

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
        let stale = Claims::new(&user, &role, now - Duration::hours(1), Duration::minutes(1));
        let token = tokens.sign(&stale).unwrap();

        assert!(matches!(
            guard.check(&headers_with(&format!("Bearer {token}"))),
            Err(ServiceError::InvalidToken)
        ));
    }

    #[test]
    fn test_allows_iff_verified_and_role_matches() {
        let tokens = issuer();
        let foreign = Arc::new(TokenIssuer::new(&AuthConfig {
            jwt_secret: "someone-else".to_string(),
            jwt_expires_in_seconds: 600,
            bcrypt_cost: 4,
        })
        .unwrap());
        let roles = ["CUSTOMER", "ADMIN", "customer", "SUPERADMIN"];

        for required in roles {
            let guard = RoleGuard::new(tokens.clone(), required);
            for held in roles {
                for (signer, verifies) in [(&tokens, true), (&foreign, false)] {
                    let headers = headers_with(&format!("Bearer {}", token_for(signer, held)));
                    let allowed = guard.check(&headers).is_ok();
                    assert_eq!(
                        allowed,
                        verifies && held == required,
                        "required={required} held={held} verifies={verifies}"
                    );
                }
            }
        }
    }
}
