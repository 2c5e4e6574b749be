//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle login, registration and the current-user lookup.
//! They are designed to be nested into the main Axum router.

use std::sync::Arc;

use crate::auth::handlers::*;
use crate::auth::middleware::{RoleGuard, authorize};
use crate::auth::models::access_control;
use crate::auth::service::AuthService;
use axum::{
    Extension, Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router(auth_service: Arc<AuthService>) -> Router {
    let customer_only = RoleGuard::new(auth_service.tokens().clone(), access_control::CUSTOMER);

    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route(
            "/whoami",
            get(who_am_i).layer(middleware::from_fn_with_state(customer_only, authorize)),
        )
        .layer(Extension(auth_service))
}
