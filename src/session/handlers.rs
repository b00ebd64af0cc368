use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    session::{
        dto::{LoginRequest, RefreshRequest, SessionResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
    },
    state::AppState,
    users::{
        dto::UserPublic,
        handlers::{non_empty, MISSING_FIELDS, USER_NOT_FOUND},
        password::verify_password_blocking,
        repo_types::User,
    },
};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            post(create_session).get(current_session).delete(delete_session),
        )
        .route("/session/refresh", post(refresh_session))
}

fn issue(keys: &JwtKeys, user: User) -> AppResult<SessionResponse> {
    Ok(SessionResponse {
        access_token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id)?,
        user: user.into(),
    })
}

async fn load_user(state: &AppState, user_id: i64) -> AppResult<User> {
    state
        .users
        .find_by_id(user_id)
        .await
        .map_err(AppError::Persistence)?
        .ok_or_else(|| {
            warn!(user_id, "token subject no longer exists");
            AppError::unauthorized(USER_NOT_FOUND)
        })
}

#[instrument(skip(state, payload))]
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<SessionResponse>> {
    let Json(req) = payload?;
    let (Some(email), Some(password)) = (non_empty(req.email), non_empty(req.password)) else {
        return Err(AppError::validation(MISSING_FIELDS));
    };

    let user = match state.users.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%email, "login unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        Err(e) => return Err(AppError::Persistence(e)),
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    info!(user_id = user.id, "session created");
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(issue(&keys, user)?))
}

#[instrument(skip(state))]
pub async fn current_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserPublic>> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn refresh_session(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<SessionResponse>> {
    let Json(req) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&req.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::unauthorized("Invalid or expired token")
    })?;

    let user_id = claims
        .user_id()
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;
    let user = load_user(&state, user_id).await?;
    Ok(Json(issue(&keys, user)?))
}

/// Tokens are stateless; the client discards them.
pub async fn delete_session() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, extract::FromRef, http::Request, http::StatusCode};
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::{
        app::build_app,
        session::jwt::JwtKeys,
        state::AppState,
        testing::{empty_request, json_request, send},
        users::{password::hash_password, repo::InMemoryUserRepository, repo_types::User},
    };

    async fn state_with_user() -> AppState {
        let repo = InMemoryUserRepository::new();
        let now = OffsetDateTime::now_utc();
        repo.seed(User {
            id: 5,
            username: "painter".into(),
            email: "painter@example.com".into(),
            password_hash: hash_password("password123").unwrap(),
            created_at: now,
            updated_at: now,
        })
        .await;
        AppState::with_users(Arc::new(repo))
    }

    fn bearer(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn login_issues_tokens_and_public_user() {
        let state = state_with_user().await;
        let (status, body) = send(
            build_app(state.clone()),
            json_request(
                "POST",
                "/api/session",
                json!({ "email": "painter@example.com", "password": "password123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], 5);
        assert!(body["user"].get("password_hash").is_none());

        let token = body["access_token"].as_str().unwrap();
        let (status, me) = send(build_app(state), bearer("/api/session", token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "painter@example.com");
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        for payload in [
            json!({ "email": "painter@example.com", "password": "wrong-password" }),
            json!({ "email": "nobody@example.com", "password": "password123" }),
        ] {
            let (status, body) = send(
                build_app(state_with_user().await),
                json_request("POST", "/api/session", payload),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({ "error": "Invalid credentials" }));
        }
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (status, body) = send(
            build_app(AppState::fake()),
            json_request("POST", "/api/session", json!({ "email": "a@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn current_session_requires_an_access_token() {
        let state = state_with_user().await;
        let (status, _) = send(build_app(state.clone()), empty_request("GET", "/api/session")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let refresh = JwtKeys::from_ref(&state).sign_refresh(5).unwrap();
        let (status, body) = send(build_app(state), bearer("/api/session", &refresh)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Access token required");
    }

    #[tokio::test]
    async fn current_session_for_a_missing_user_is_401() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign_access(77).unwrap();
        let (status, body) = send(build_app(state), bearer("/api/session", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn refresh_issues_a_new_pair_only_for_refresh_tokens() {
        let state = state_with_user().await;
        let keys = JwtKeys::from_ref(&state);

        let (status, body) = send(
            build_app(state.clone()),
            json_request(
                "POST",
                "/api/session/refresh",
                json!({ "refresh_token": keys.sign_refresh(5).unwrap() }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["access_token"].is_string());
        assert_eq!(body["user"]["username"], "painter");

        let (status, _) = send(
            build_app(state),
            json_request(
                "POST",
                "/api/session/refresh",
                json!({ "refresh_token": keys.sign_access(5).unwrap() }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn delete_is_no_content() {
        let (status, _) = send(build_app(AppState::fake()), empty_request("DELETE", "/api/session")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
