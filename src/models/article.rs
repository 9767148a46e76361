//! Article data models and API request types.
//!
//! This module defines:
//! - `Article`: a persisted blog article
//! - `NewArticle` / `ArticlePatch`: validated inputs for create and update
//! - `CreateArticleRequest` / `UpdateArticleRequest`: JSON request bodies
//!
//! Required-field validation lives here rather than in a particular store, so
//! every `ArticleStore` implementation receives input that already satisfies
//! the article rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Reasons an article payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("content is required")]
    MissingContent,

    /// The request body was not valid JSON for the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("malformed article id: {0}")]
    MalformedId(String),
}

/// A blog article as stored.
///
/// # Database Table
///
/// Maps to the `articles` table. `id` is generated by the store and never
/// changes; `created_at` is set once and `updated_at` on every write.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "title": "Hello",
///   "content": "First post",
///   "createdAt": "2025-12-20T10:00:00Z",
///   "updatedAt": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Materialize a new article with both timestamps set to `now`.
    pub fn create(id: Uuid, new: NewArticle, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            content: new.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the supplied fields of `patch`; unspecified fields keep their values.
    pub fn apply(&mut self, patch: ArticlePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = now;
    }
}

/// Validated input for creating an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    title: String,
    content: String,
}

impl NewArticle {
    /// Both fields must be present and non-empty.
    pub fn new(
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Self, ValidationError> {
        let title = required(title).ok_or(ValidationError::MissingTitle)?;
        let content = required(content).ok_or(ValidationError::MissingContent)?;
        Ok(Self { title, content })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Validated partial update.
///
/// A stored article already satisfies the required-field rules, so checking
/// each supplied field is enough to guarantee the merged document does too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    title: Option<String>,
    content: Option<String>,
}

impl ArticlePatch {
    /// Supplied fields must be non-empty; absent fields are left untouched.
    pub fn new(
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Self, ValidationError> {
        if title.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::MissingTitle);
        }
        if content.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::MissingContent);
        }
        Ok(Self { title, content })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Request body for `POST /api/articles`.
///
/// Fields are optional at the JSON level so that a missing field is reported
/// as a validation failure rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

impl TryFrom<CreateArticleRequest> for NewArticle {
    type Error = ValidationError;

    fn try_from(request: CreateArticleRequest) -> Result<Self, Self::Error> {
        NewArticle::new(request.title, request.content)
    }
}

/// Request body for `PUT /api/articles/{id}`; every field is optional.
///
/// The outer `Option` records whether the field was present at all, the
/// inner one whether it was `null`. An explicit `null` clears the field and
/// is rejected like an empty string.
///
/// # JSON Example
///
/// ```json
/// { "title": "New title" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
}

/// Only called for fields present in the body, so a `null` becomes `Some(None)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateArticleRequest> for ArticlePatch {
    type Error = ValidationError;

    fn try_from(request: UpdateArticleRequest) -> Result<Self, Self::Error> {
        let title = match request.title {
            Some(None) => return Err(ValidationError::MissingTitle),
            other => other.flatten(),
        };
        let content = match request.content {
            Some(None) => return Err(ValidationError::MissingContent),
            other => other.flatten(),
        };
        ArticlePatch::new(title, content)
    }
}

/// Parse a path segment into an article id.
pub fn parse_article_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::MalformedId(raw.to_string()))
}
