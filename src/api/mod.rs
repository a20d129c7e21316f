use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::core::{Task, TaskPatch};

/// Failure taxonomy for every gateway call. Callers are expected to handle
/// the variant, not just log it; an `Auth` error on a task operation means
/// the stored token is no longer good.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },
    #[error("request rejected ({status}): {message}")]
    Validation { status: u16, message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Error body most REST backends return alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

/// Thin client for the task API: one HTTP client, one base URL, one request
/// per call. No retries and no batching; the server's answer is final.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().build().map_err(ApiError::Network)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ApiError> {
        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        });
        let resp = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let resp = check(resp).await?;
        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(auth.token)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        let resp = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let resp = check(resp).await?;
        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(auth.token)
    }

    /// Fetch the full task collection, in server order.
    pub async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        let resp = self
            .http
            .get(format!("{}/tasks", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let resp = check(resp).await?;
        let tasks: Vec<Task> = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        log::debug!("fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Create a task and return the server's record of it (with its id).
    pub async fn create_task(&self, token: &str, title: &str) -> Result<Task, ApiError> {
        let body = serde_json::json!({ "title": title });
        let resp = self
            .http
            .post(format!("{}/tasks", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let resp = check(resp).await?;
        resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Partial update. Some backends answer with the updated task, others
    /// with a bare 200; both count as success.
    pub async fn update_task(
        &self,
        token: &str,
        id: &str,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, ApiError> {
        let resp = self
            .http
            .put(format!("{}/tasks/{}", self.base_url, id))
            .bearer_auth(token)
            .json(patch)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let resp = check(resp).await?;
        let text = resp.text().await.map_err(ApiError::Network)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&text) {
            Ok(task) => Ok(Some(task)),
            Err(e) => {
                log::debug!("ignoring non-task update response body: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn delete_task(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(format!("{}/tasks/{}", self.base_url, id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::Network)?;
        check(resp).await?;
        Ok(())
    }
}

/// Classify a non-2xx response into the error taxonomy, pulling the server's
/// `{message}` out of the body when it provides one.
async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                "something went wrong".to_string()
            } else {
                text.trim().to_string()
            }
        });

    log::warn!("request failed with {}: {}", status, message);

    let code = status.as_u16();
    Err(if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        ApiError::Auth { status: code, message }
    } else if status.is_server_error() {
        ApiError::Server { status: code, message }
    } else {
        ApiError::Validation { status: code, message }
    })
}
