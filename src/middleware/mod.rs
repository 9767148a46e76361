//! HTTP middleware components.

/// Admin token authentication middleware
pub mod auth;
