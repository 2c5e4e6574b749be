//! Top-level API routing.
//!
//! Assembles the root status route, the `/v1/auth` routes and the
//! not-found fallback into the application router.

pub mod common;

use std::sync::Arc;

use crate::auth::routes::auth_router;
use crate::auth::service::AuthService;
use axum::{Router, routing::get};

/// Builds the full application router.
pub fn app_router(auth_service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/", get(common::root_handler))
        .nest("/v1/auth", auth_router(auth_service))
        .fallback(common::not_found_handler)
}
