//! Error types and HTTP error response handling.
//!
//! Every failure is translated here into a status code and a JSON body of the
//! form `{ "error": "<message>" }`. Messages are generic; the underlying cause
//! (store errors, signing internals) is logged but never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    models::article::ValidationError,
    services::auth_gate::{AuthError, LoginError},
    store::StoreError,
};

/// Application-wide error type.
///
/// # Status Code Mapping
///
/// - `Validation` → 400 Bad Request
/// - `MissingToken` → 401 Unauthorized
/// - `InvalidPassword` → 401 Unauthorized (body also has `success: false`)
/// - `InvalidToken` → 403 Forbidden
/// - `NotFound` → 404 Not Found
/// - `Storage`, `TokenSigning` → 500 Internal Server Error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Access token required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Article not found")]
    NotFound,

    /// Article input was rejected. `context` is the message shown to clients.
    #[error("{context}")]
    Validation {
        context: &'static str,
        #[source]
        source: ValidationError,
    },

    /// The store failed for a reason other than validation or a missing id.
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Error issuing token")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Adapter for `map_err` that classifies a store failure under `context`.
    ///
    /// A store-side rejection of the document is a validation failure; anything
    /// else is a storage failure.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| match source {
            StoreError::Rejected(reason) => AppError::Validation {
                context,
                source: ValidationError::MalformedBody(reason),
            },
            source => AppError::Storage { context, source },
        }
    }

    /// Adapter for `map_err` that reports a validation failure under `context`.
    pub fn invalid(context: &'static str) -> impl FnOnce(ValidationError) -> AppError {
        move |source| AppError::Validation { context, source }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => AppError::MissingToken,
            AuthError::InvalidToken => AppError::InvalidToken,
        }
    }
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidPassword => AppError::InvalidPassword,
            LoginError::Signing(e) => AppError::TokenSigning(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation { source, .. } => {
                tracing::debug!(error = %source, "rejected article input");
                StatusCode::BAD_REQUEST
            }
            AppError::MissingToken | AppError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Storage { source, .. } => {
                tracing::error!(error = %source, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::TokenSigning(e) => {
                tracing::error!(error = %e, "token signing failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match self {
            AppError::InvalidPassword => json!({
                "success": false,
                "error": self.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
