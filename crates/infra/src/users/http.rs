use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use salesdesk_core::UserId;

use super::{User, UserDirectory, UserLookupError};

/// `UserDirectory` backed by the user service's REST API
/// (`GET {base_url}/{user_id}`).
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    base_url: String,
    client: reqwest::Client,
}

impl HttpUserDirectory {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UserLookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UserLookupError::Transport(e.to_string()))?;

        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, user_id: &UserId) -> String {
        format!("{}/{}", self.base_url, user_id)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn resolve(&self, user_id: &UserId) -> Result<User, UserLookupError> {
        let url = self.user_url(user_id);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UserLookupError::Transport(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => resp
                .json::<User>()
                .await
                .map_err(|e| UserLookupError::Decode(e.to_string())),
            StatusCode::NOT_FOUND => Err(UserLookupError::NotFound(user_id.clone())),
            status => Err(UserLookupError::UnexpectedStatus {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, response::IntoResponse, routing::get, Json, Router};

    async fn user_handler(Path(id): Path<String>) -> axum::response::Response {
        match id.as_str() {
            "user123" => Json(serde_json::json!({ "id": "user123", "name": "Test User 123" })).into_response(),
            "broken" => (AxumStatus::INTERNAL_SERVER_ERROR, "boom").into_response(),
            "garbled" => (AxumStatus::OK, "not json").into_response(),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(serde_json::json!({ "id": "slow", "name": "Slow" })).into_response()
            }
            _ => (AxumStatus::NOT_FOUND, "User not found").into_response(),
        }
    }

    async fn spawn_user_service() -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new().route("/users/:id", get(user_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/users"), handle)
    }

    #[tokio::test]
    async fn resolves_existing_user() {
        let (url, handle) = spawn_user_service().await;
        let dir = HttpUserDirectory::new(url, Duration::from_secs(2)).unwrap();

        let user = dir.resolve(&UserId::new("user123")).await.unwrap();
        assert_eq!(user.id, UserId::new("user123"));
        assert_eq!(user.name, "Test User 123");
        handle.abort();
    }

    #[tokio::test]
    async fn maps_404_to_not_found() {
        let (url, handle) = spawn_user_service().await;
        let dir = HttpUserDirectory::new(url, Duration::from_secs(2)).unwrap();

        let err = dir.resolve(&UserId::new("ghost")).await.unwrap_err();
        assert_eq!(err, UserLookupError::NotFound(UserId::new("ghost")));
        handle.abort();
    }

    #[tokio::test]
    async fn other_statuses_are_not_definitive() {
        let (url, handle) = spawn_user_service().await;
        let dir = HttpUserDirectory::new(url, Duration::from_secs(2)).unwrap();

        let err = dir.resolve(&UserId::new("broken")).await.unwrap_err();
        assert_eq!(
            err,
            UserLookupError::UnexpectedStatus {
                status: 500,
                body: "boom".to_string(),
            }
        );

        let err = dir.resolve(&UserId::new("garbled")).await.unwrap_err();
        assert!(matches!(err, UserLookupError::Decode(_)));
        handle.abort();
    }

    #[tokio::test]
    async fn client_timeout_is_a_transport_failure() {
        let (url, handle) = spawn_user_service().await;
        let dir = HttpUserDirectory::new(url, Duration::from_millis(100)).unwrap();

        let err = dir.resolve(&UserId::new("slow")).await.unwrap_err();
        assert!(matches!(err, UserLookupError::Transport(_)));
        assert!(!err.is_not_found());
        handle.abort();
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_failure() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = HttpUserDirectory::new(format!("http://{addr}/users/"), Duration::from_secs(1)).unwrap();
        assert_eq!(dir.base_url(), format!("http://{addr}/users"));

        let err = dir.resolve(&UserId::new("user123")).await.unwrap_err();
        assert!(matches!(err, UserLookupError::Transport(_)));
    }
}
