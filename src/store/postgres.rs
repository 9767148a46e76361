//! PostgreSQL implementation of [`ArticleStore`].
//!
//! Every operation is a single SQL statement, so per-document atomicity comes
//! from Postgres. The `articles` table also carries CHECK constraints on
//! `title` and `content`; those are a second line of defence behind the
//! validation in `models::article` and surface as [`StoreError::Rejected`].

use async_trait::async_trait;
use uuid::Uuid;

use super::{ArticleStore, StoreError};
use crate::{
    db::DbPool,
    models::article::{Article, ArticlePatch, NewArticle},
};

/// Article store over the `articles` table.
///
/// Cloning is cheap: the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgArticleStore {
    pool: DbPool,
}

impl PgArticleStore {
    /// Wrap a pool whose schema has already been migrated.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    /// Fetch every article, newest first.
    ///
    /// Served by `idx_articles_created_at`. Rows sharing a `created_at` come
    /// back in whatever order Postgres produces for that query.
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM articles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    /// Primary-key lookup; `None` when no row has this id.
    async fn find(&self, id: Uuid) -> Result<Option<Article>, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// Insert with a fresh UUIDv4 id.
    ///
    /// # Errors
    ///
    /// - `Rejected`: a CHECK or NOT NULL constraint refused the row
    /// - `Database`: any other failure
    async fn insert(&self, article: NewArticle) -> Result<Article, StoreError> {
        // NOW() is fixed for the statement, so created_at == updated_at
        let article = sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO articles (id, title, content, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(article.title())
        .bind(article.content())
        .fetch_one(&self.pool)
        .await?;

        Ok(article)
    }

    /// Overwrite the supplied fields and bump `updated_at`.
    ///
    /// `COALESCE` keeps the stored value for fields the patch leaves out, so
    /// the read-modify-write happens inside a single statement.
    async fn update(
        &self,
        id: Uuid,
        patch: ArticlePatch,
    ) -> Result<Option<Article>, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            UPDATE articles
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.title())
        .bind(patch.content())
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// Delete by id, returning the removed row.
    async fn delete(&self, id: Uuid) -> Result<Option<Article>, StoreError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            DELETE FROM articles
            WHERE id = $1
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    /// Round-trip a trivial query; used by `/health`.
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
