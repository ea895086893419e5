//! HTTP transport for the interview protocol
//!
//! [`InterviewApi`] is the seam the session synchronizer talks through;
//! tests inject a mock, production injects [`HttpInterviewApi`]. The
//! credential is an explicit constructor argument, never ambient state.

use super::error::ClientError;
use crate::interview::Turn;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Response shape shared by Start and Message.
///
/// Parsed strictly: a type mismatch anywhere rejects the whole response.
/// Extra fields inside `state` (the server's collected buckets) are
/// tolerated; only the thread is contractual.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StepResponse {
    pub assistant: Option<String>,
    pub pending_step: Option<String>,
    pub state: StepState,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StepState {
    pub thread: Vec<Turn>,
}

/// The two operations the server exposes for an interview.
#[async_trait]
pub trait InterviewApi {
    async fn start(&self, transfer_id: i64) -> Result<StepResponse, ClientError>;
    async fn message(&self, transfer_id: i64, message: &str) -> Result<StepResponse, ClientError>;
}

/// reqwest-backed implementation against a running server.
pub struct HttpInterviewApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
    role: String,
}

impl HttpInterviewApi {
    /// `base_url` is the server root (e.g. `http://localhost:8000`); the
    /// `/api/v1` prefix is appended here.
    pub fn new(base_url: &str, token: impl Into<String>, role: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: format!("{}/api/v1", base_url.trim_end_matches('/')),
            token: token.into(),
            role: role.into(),
        }
    }

    async fn post(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<StepResponse, ClientError> {
        let mut req = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .header("X-Role", &self.role);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Transport(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                ClientError::Transport(format!("Connection failed: {e}"))
            } else {
                ClientError::Transport(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::Transport(format!("Malformed response: {e}")))
    }
}

#[async_trait]
impl InterviewApi for HttpInterviewApi {
    async fn start(&self, transfer_id: i64) -> Result<StepResponse, ClientError> {
        self.post(&format!("/chat/transfers/{transfer_id}/start"), None)
            .await
    }

    async fn message(&self, transfer_id: i64, message: &str) -> Result<StepResponse, ClientError> {
        self.post(
            &format!("/chat/transfers/{transfer_id}/message"),
            Some(serde_json::json!({ "message": message })),
        )
        .await
    }
}

/// Reduce an error body to one human-readable message: the conventional
/// `detail` field when present, else the raw body, else `HTTP <status>`.
fn extract_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(serde_json::Value::as_str) {
            return detail.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}

fn classify_error(status: StatusCode, body: &str) -> ClientError {
    ClientError::from_status(status.as_u16(), extract_detail(status, body))
}
