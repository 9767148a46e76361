//! Authentication HTTP handlers.
//!
//! - POST /api/auth/login - Exchange the admin password for a bearer token
//! - GET /api/auth/check - Confirm a bearer token is still valid

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AppState, error::AppError, models::claims::AdminClaims};

/// Request body for `POST /api/auth/login`.
///
/// `password` is kept as raw JSON so that a number, boolean or `null` is
/// refused as a wrong password instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
}

/// Log in as admin.
///
/// # Request Body
///
/// ```json
/// { "password": "admin123" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "success": true, "token": "<jwt>" }`
/// - **Error (401)**: `{ "success": false, "error": "Invalid password" }`
///
/// Every other body, including one that is empty, not JSON, or carries a
/// non-string `password`, gets the same 401.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "admin login with unreadable body");
            LoginRequest::default()
        }
    };

    // Only a string can ever match
    let Some(Value::String(password)) = request.password else {
        tracing::warn!("admin login attempt without a password string");
        return Err(AppError::InvalidPassword);
    };

    let token = state.gate.login(&password).map_err(|e| {
        tracing::warn!(error = %e, "admin login failed");
        AppError::from(e)
    })?;

    tracing::info!("admin logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}

/// Report that the caller holds a valid token.
///
/// Only reachable once the auth middleware has accepted the request.
pub async fn check(Extension(_claims): Extension<AdminClaims>) -> Json<CheckResponse> {
    Json(CheckResponse {
        authenticated: true,
    })
}
