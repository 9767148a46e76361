//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the article store or the auth gate
//! 3. Returns HTTP response (JSON, status code)

/// Article CRUD endpoints
pub mod articles;
/// Admin login and token check endpoints
pub mod auth;
/// Service health endpoint
pub mod health;
