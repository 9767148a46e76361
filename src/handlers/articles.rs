//! Article HTTP handlers.
//!
//! This module implements the article API endpoints:
//! - GET /api/articles - List all articles, newest first
//! - GET /api/articles/{id} - Get article by ID
//! - POST /api/articles - Create article (admin)
//! - PUT /api/articles/{id} - Update supplied fields of an article (admin)
//! - DELETE /api/articles/{id} - Delete article (admin)

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    AppState,
    error::AppError,
    models::{
        article::{
            Article, ArticlePatch, CreateArticleRequest, NewArticle, UpdateArticleRequest,
            ValidationError, parse_article_id,
        },
        claims::AdminClaims,
    },
    store::StoreError,
};

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// List all articles.
///
/// # Response
///
/// - **Success (200 OK)**: array of articles ordered by `createdAt`, newest first
/// - **Error (500)**: store unavailable
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let articles = state
        .store
        .list()
        .await
        .map_err(AppError::store("Error fetching articles"))?;

    Ok(Json(articles))
}

/// Get a single article.
///
/// # Response
///
/// - **Success (200 OK)**: the article
/// - **Error (404)**: no article with this id
/// - **Error (500)**: malformed id or store failure
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    const CONTEXT: &str = "Error fetching article";

    let id = parse_article_id(&id).map_err(unaddressable(CONTEXT))?;

    let article = state
        .store
        .find(id)
        .await
        .map_err(AppError::store(CONTEXT))?
        .ok_or(AppError::NotFound)?;

    Ok(Json(article))
}

/// Create an article.
///
/// # Request Body
///
/// ```json
/// { "title": "Hello", "content": "First post" }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the stored article with its generated id and timestamps
/// - **Error (400)**: missing or empty `title`/`content`, or unparseable body
/// - **Error (401/403)**: missing or invalid token
pub async fn create_article(
    State(state): State<AppState>,
    Extension(_claims): Extension<AdminClaims>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    const CONTEXT: &str = "Error creating article";

    let Json(request) = payload.map_err(|e| rejected_body(CONTEXT, e))?;
    let article = NewArticle::try_from(request).map_err(AppError::invalid(CONTEXT))?;

    let article = state
        .store
        .insert(article)
        .await
        .map_err(AppError::store(CONTEXT))?;

    tracing::info!(article_id = %article.id, "article created");

    Ok((StatusCode::CREATED, Json(article)))
}

/// Update an article.
///
/// Only the supplied fields are changed. Supplying an empty `title` or
/// `content` is rejected and leaves the article untouched.
///
/// # Response
///
/// - **Success (200 OK)**: the updated article
/// - **Error (400)**: empty field, malformed id, or unparseable body
/// - **Error (404)**: no article with this id
/// - **Error (401/403)**: missing or invalid token
pub async fn update_article(
    State(state): State<AppState>,
    Extension(_claims): Extension<AdminClaims>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateArticleRequest>, JsonRejection>,
) -> Result<Json<Article>, AppError> {
    const CONTEXT: &str = "Error updating article";

    let id = parse_article_id(&id).map_err(AppError::invalid(CONTEXT))?;
    let Json(request) = payload.map_err(|e| rejected_body(CONTEXT, e))?;
    let patch = ArticlePatch::try_from(request).map_err(AppError::invalid(CONTEXT))?;

    let article = state
        .store
        .update(id, patch)
        .await
        .map_err(AppError::store(CONTEXT))?
        .ok_or(AppError::NotFound)?;

    tracing::info!(article_id = %article.id, "article updated");

    Ok(Json(article))
}

/// Delete an article.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "message": "Article deleted successfully" }`
/// - **Error (404)**: no article with this id
/// - **Error (500)**: malformed id or store failure
/// - **Error (401/403)**: missing or invalid token
pub async fn delete_article(
    State(state): State<AppState>,
    Extension(_claims): Extension<AdminClaims>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    const CONTEXT: &str = "Error deleting article";

    let id = parse_article_id(&id).map_err(unaddressable(CONTEXT))?;

    let article = state
        .store
        .delete(id)
        .await
        .map_err(AppError::store(CONTEXT))?
        .ok_or(AppError::NotFound)?;

    tracing::info!(article_id = %article.id, "article deleted");

    Ok(Json(DeleteResponse {
        message: "Article deleted successfully",
    }))
}

/// Reads and deletes report an unparseable id as a storage failure.
fn unaddressable(context: &'static str) -> impl FnOnce(ValidationError) -> AppError {
    move |e| AppError::Storage {
        context,
        source: StoreError::InvalidId(e.to_string()),
    }
}

fn rejected_body(context: &'static str, rejection: JsonRejection) -> AppError {
    AppError::Validation {
        context,
        source: ValidationError::MalformedBody(rejection.body_text()),
    }
}
