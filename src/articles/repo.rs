use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::articles::repo_types::{NewArticle, PaintingArticle};
use crate::db::RepoResult;

/// Accessor for the `painting_articles` table.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, article: NewArticle) -> RepoResult<PaintingArticle>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<PaintingArticle>>;
}

#[derive(Clone)]
pub struct PgArticleRepository {
    db: PgPool,
}

impl PgArticleRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn create(&self, article: NewArticle) -> RepoResult<PaintingArticle> {
        let row = sqlx::query_as::<_, PaintingArticle>(
            r#"
            INSERT INTO painting_articles (title, content)
            VALUES ($1, $2)
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<PaintingArticle>> {
        let row = sqlx::query_as::<_, PaintingArticle>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM painting_articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryArticleRepository {
    articles: Arc<RwLock<Vec<PaintingArticle>>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn create(&self, article: NewArticle) -> RepoResult<PaintingArticle> {
        let mut articles = self.articles.write().await;
        let now = OffsetDateTime::now_utc();
        let row = PaintingArticle {
            id: articles.iter().map(|a| a.id).max().unwrap_or(0) + 1,
            title: article.title,
            content: article.content,
            created_at: now,
            updated_at: now,
        };
        articles.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<PaintingArticle>> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }
}
