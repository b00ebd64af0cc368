use std::sync::Arc;

use crate::articles::repo::{ArticleRepository, InMemoryArticleRepository, PgArticleRepository};
use crate::config::AppConfig;
use crate::db;
use crate::users::repo::{InMemoryUserRepository, PgUserRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub articles: Arc<dyn ArticleRepository>,
}

impl AppState {
    /// Connects to Postgres, applies migrations and wires the SQL repositories.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await;

        Ok(Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            articles: Arc::new(PgArticleRepository::new(pool)),
            config,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        articles: Arc<dyn ArticleRepository>,
    ) -> Self {
        Self {
            config,
            users,
            articles,
        }
    }

    /// State backed by empty in-memory stores and test settings.
    pub fn fake() -> Self {
        Self::with_users(Arc::new(InMemoryUserRepository::new()))
    }

    pub fn with_users(users: Arc<dyn UserRepository>) -> Self {
        Self::from_parts(
            Arc::new(AppConfig::for_tests()),
            users,
            Arc::new(InMemoryArticleRepository::new()),
        )
    }
}
