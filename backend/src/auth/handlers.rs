//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse request data and delegate to `auth::service` for
//! the core business logic. Errors are rendered by `ServiceError`'s
//! `IntoResponse` implementation.

use std::sync::Arc;

use crate::api::common::ApiJson;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::errors::ServiceError;
use crate::utils::jwt::Claims;
use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json as ResponseJson,
};

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(auth_service): Extension<Arc<AuthService>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(StatusCode, ResponseJson<AccessTokenResponse>), ServiceError> {
    let response = auth_service.login(payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(response)))
}

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(auth_service): Extension<Arc<AuthService>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<AccessTokenResponse>), ServiceError> {
    let response = auth_service.register(payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(response)))
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn who_am_i(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<UserInfo>, ServiceError> {
    let user = auth_service.current_user(&claims).await?;
    Ok(ResponseJson(user))
}
