use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    db::RepoError,
    error::{AppError, AppResult},
    state::AppState,
    users::{
        dto::{CreateUserRequest, UserPublic},
        password::hash_password_blocking,
        repo_types::NewUser,
    },
};

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const EMAIL_TAKEN: &str = "Email already exists";
pub const INVALID_ID: &str = "Invalid ID";
pub const USER_NOT_FOUND: &str = "User not found";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user))
}

pub(crate) fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

pub(crate) fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>().map_err(|_| {
        warn!(id = %raw, "invalid id");
        AppError::validation(INVALID_ID)
    })
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserPublic>)> {
    let Json(req) = payload?;

    let (Some(username), Some(email), Some(password)) = (
        non_empty(req.username),
        non_empty(req.email),
        non_empty(req.password),
    ) else {
        warn!("missing required fields");
        return Err(AppError::validation(MISSING_FIELDS));
    };

    // Fast path; the unique constraint below is what actually guarantees uniqueness.
    match state.users.find_by_email(&email).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            warn!(%email, "email already registered");
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
        Err(e) => return Err(AppError::Persistence(e)),
    }

    let password_hash = hash_password_blocking(password).await?;

    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            RepoError::UniqueViolation(constraint) => {
                warn!(%constraint, "email taken at insert");
                AppError::conflict(EMAIL_TAKEN)
            }
            other => AppError::Internal(other.into()),
        })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<UserPublic>> {
    let Ok(Path(id)) = id else {
        warn!("undecodable id segment");
        return Err(AppError::validation(INVALID_ID));
    };
    let id = parse_id(&id)?;

    let user = state
        .users
        .find_by_id(id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

    Ok(Json(user.into()))
}
