//! Authentication module for managing users, tokens, and access control.
//!
//! This module provides the public interface for authentication-related
//! functionality: login, registration, the credential store seam, and the
//! role guard middleware.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
