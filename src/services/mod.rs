//! Business logic that is independent of HTTP routing.

/// Admin password login and bearer token verification
pub mod auth_gate;
