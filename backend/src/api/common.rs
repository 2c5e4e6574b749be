//! Error handling utilities for API responses.
//!
//! Converts service-layer errors into HTTP responses and hosts the
//! application-level handlers (root status, not-found fallback).
//!
//! # Response Format
//! Every error returns the same JSON envelope:
//!
//! ```json
//! { "error": { "name": "...", "message": "...", "details": null } }
//! ```
//!
//! # Error Handling Flow
//! 1. Service layer (or a route guard) returns a domain-specific `ServiceError`
//! 2. `service_error_to_http` picks the status code and builds the envelope
//! 3. Internal failures are logged and replaced by a generic message

use crate::errors::ServiceError;
use axum::{
    Json,
    extract::{FromRequest, OriginalUri, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON envelope for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error name
    pub name: String,
    /// Human-readable message
    pub message: String,
    /// Structured details, `null` when the error carries none
    pub details: Option<Value>,
}

/// JSON body extractor whose rejections use the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ServiceError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::validation(rejection.body_text())
    }
}

/// Root status payload
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// HTTP status code for each error kind
pub fn status_code(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::MissingToken
        | ServiceError::InvalidToken
        | ServiceError::InsufficientAccess { .. }
        | ServiceError::WrongPassword => StatusCode::UNAUTHORIZED,
        ServiceError::EmailNotRegistered { .. }
        | ServiceError::NotFound { .. }
        | ServiceError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::EmailAlreadyTaken { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
        ServiceError::Database { .. } | ServiceError::InternalError { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = status_code(&error);

    let message = if error.is_internal() {
        tracing::error!("Unhandled error: {}", error);
        "Internal server error".to_string()
    } else {
        error.to_string()
    };

    let body = ErrorResponse {
        error: ErrorBody {
            name: error.name().to_string(),
            message,
            details: error.details(),
        },
    };

    (status, Json(body))
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        service_error_to_http(self).into_response()
    }
}

/// Health/status response for `GET /`
pub async fn root_handler() -> (StatusCode, Json<StatusResponse>) {
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: "OK".to_string(),
            message: "BCR API is up and running!".to_string(),
        }),
    )
}

/// Fallback for unmatched routes
pub async fn not_found_handler(method: Method, OriginalUri(uri): OriginalUri) -> ServiceError {
    ServiceError::RouteNotFound {
        method: method.to_string(),
        url: uri.to_string(),
    }
}
