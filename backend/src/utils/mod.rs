//! Collection of general utility modules.
//!
//! Token signing and password hashing live here; both are pure, synchronous
//! helpers used by the authentication service and route guards.

pub mod jwt;
pub mod password;
