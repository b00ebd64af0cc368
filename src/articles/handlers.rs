use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    articles::{
        dto::{ArticlePublic, CreateArticleRequest},
        repo_types::NewArticle,
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub const ARTICLE_NOT_FOUND: &str = "Not found";

pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/painting-articles", post(create_article))
        .route("/painting-articles/:id", get(get_article))
}

#[instrument(skip(state, payload))]
pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ArticlePublic>)> {
    let Json(req) = payload?;

    let article = state
        .articles
        .create(NewArticle {
            title: req.title,
            content: req.content,
        })
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    info!(article_id = article.id, "painting article created");
    Ok((StatusCode::CREATED, Json(article.into())))
}

#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<ArticlePublic>> {
    // A non-numeric id can never match a row.
    let Some(id) = id.ok().and_then(|Path(id)| id.parse::<i64>().ok()) else {
        return Err(AppError::not_found(ARTICLE_NOT_FOUND));
    };

    let article = state
        .articles
        .find_by_id(id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::not_found(ARTICLE_NOT_FOUND))?;

    Ok(Json(article.into()))
}
