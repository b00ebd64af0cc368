use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::routes;
use crate::users::dto::UserPublic;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status; `error`/`message` come from its JSON body when present.
    #[error("request failed with status {status}")]
    Status {
        status: u16,
        error: Option<String>,
        message: Option<String>,
    },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Client view of the users endpoints.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn create_user(&self, payload: &CreateUserPayload) -> Result<UserPublic, ApiError>;

    async fn get_user_by_id(&self, id: i64) -> Result<UserPublic, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUsersApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Uses `API_URL`, or [`DEFAULT_API_URL`] when unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode(res: reqwest::Response) -> Result<UserPublic, ApiError> {
        let status = res.status();
        if !status.is_success() {
            let body = res.json::<ErrorBody>().await.unwrap_or_default();
            debug!(%status, error = ?body.error, "api call failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                error: body.error,
                message: body.message,
            });
        }
        let bytes = res.bytes().await.map_err(ApiError::Network)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn create_user(&self, payload: &CreateUserPayload) -> Result<UserPublic, ApiError> {
        let res = self
            .client
            .post(self.url(&routes::api::users::create()))
            .json(payload)
            .send()
            .await
            .map_err(ApiError::Network)?;
        Self::decode(res).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<UserPublic, ApiError> {
        let res = self
            .client
            .get(self.url(&routes::api::users::show(id)))
            .send()
            .await
            .map_err(ApiError::Network)?;
        Self::decode(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, state::AppState};

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_app(AppState::fake())).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn payload(email: &str) -> CreateUserPayload {
        CreateUserPayload {
            username: "new-user".into(),
            email: email.into(),
            password: "password123".into(),
        }
    }

    #[tokio::test]
    async fn create_then_fetch_over_http() {
        let api = HttpUsersApi::new(spawn_server().await).unwrap();

        let created = api.create_user(&payload("user@example.com")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.username, "new-user");

        let fetched = api.get_user_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn server_errors_keep_error_and_message() {
        let api = HttpUsersApi::new(spawn_server().await).unwrap();
        api.create_user(&payload("dup@example.com")).await.unwrap();

        match api.create_user(&payload("dup@example.com")).await {
            Err(ApiError::Status {
                status,
                error,
                message,
            }) => {
                assert_eq!(status, 422);
                assert_eq!(error.as_deref(), Some("Email already exists"));
                assert_eq!(message.as_deref(), Some("Email already exists"));
            }
            other => panic!("expected a 422, got {other:?}"),
        }

        match api.get_user_by_id(404).await {
            Err(ApiError::Status { status, message, .. }) => {
                assert_eq!(status, 404);
                assert!(message.is_none());
            }
            other => panic!("expected a 404, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpUsersApi::new(format!("http://{addr}/")).unwrap();
        let err = api.get_user_by_id(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
