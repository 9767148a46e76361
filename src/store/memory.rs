//! In-process [`ArticleStore`] backed by a `Vec` behind an async `RwLock`.
//!
//! Selected with `DATABASE_URL=memory:`. Contents are lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ArticleStore, StoreError};
use crate::models::article::{Article, ArticlePatch, NewArticle};

/// Articles kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        let articles = self.articles.read().await;

        // Reverse first so that equal timestamps keep newest-inserted first
        // through the stable sort.
        let mut listed: Vec<Article> = articles.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Article>, StoreError> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, article: NewArticle) -> Result<Article, StoreError> {
        // Stamp under the guard so insertion order never contradicts created_at
        let mut articles = self.articles.write().await;
        let article = Article::create(Uuid::new_v4(), article, Utc::now());
        articles.push(article.clone());
        Ok(article)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ArticlePatch,
    ) -> Result<Option<Article>, StoreError> {
        let mut articles = self.articles.write().await;
        let Some(article) = articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        article.apply(patch, Utc::now());
        Ok(Some(article.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Article>, StoreError> {
        let mut articles = self.articles.write().await;
        let removed = articles
            .iter()
            .position(|a| a.id == id)
            .map(|index| articles.remove(index));
        Ok(removed)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
