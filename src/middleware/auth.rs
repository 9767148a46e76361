//! Admin token authentication middleware.
//!
//! Applied with `route_layer` to the mutating article routes and
//! `/api/auth/check`. For each request it:
//! 1. Asks the `AuthGate` to check the `Authorization: Bearer <token>` header
//! 2. On success, inserts the decoded `AdminClaims` into the request extensions
//! 3. Otherwise short-circuits with 401 (no token) or 403 (invalid token)

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError};

/// Admin authentication middleware function.
///
/// Handlers behind this layer can extract `Extension<AdminClaims>`.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.gate.check(request.headers())?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
