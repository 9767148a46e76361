//! Article storage.
//!
//! Handlers talk to storage only through the [`ArticleStore`] trait. Each
//! method is a single atomic operation against the backing store; nothing in
//! this crate coordinates across calls.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::article::{Article, ArticlePatch, NewArticle};

/// In-process store for local development and tests
pub mod memory;
/// PostgreSQL-backed store
pub mod postgres;

pub use memory::MemoryArticleStore;
pub use postgres::PgArticleStore;

/// Failures reported by an [`ArticleStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store refused the document (e.g. a constraint on a required field).
    #[error("document rejected by store: {0}")]
    Rejected(String),

    /// The id cannot address any document in this store.
    #[error("invalid document id: {0}")]
    InvalidId(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

/// Postgres error codes for `not_null_violation` and `check_violation`.
const REJECTION_CODES: [&str; 2] = ["23502", "23514"];

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db
                .code()
                .is_some_and(|code| REJECTION_CODES.contains(&&*code))
            {
                return StoreError::Rejected(db.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Document store contract for articles.
///
/// Ids are generated by the store on insert. Timestamps are set by the store:
/// both on insert, `updated_at` on every update.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// All articles, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Article>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Article>, StoreError>;

    async fn insert(&self, article: NewArticle) -> Result<Article, StoreError>;

    /// Apply `patch` to the article, returning the updated document or `None`
    /// if no article has this id.
    async fn update(
        &self,
        id: Uuid,
        patch: ArticlePatch,
    ) -> Result<Option<Article>, StoreError>;

    /// Remove the article, returning it or `None` if no article has this id.
    async fn delete(&self, id: Uuid) -> Result<Option<Article>, StoreError>;

    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
