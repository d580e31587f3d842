//! REST session bootstrap.
//!
//! Before a client can join a session over the channel it needs a
//! session id. The backend mints ids (`POST /api/sessions`) and answers
//! existence checks (`GET /api/sessions/{id}`). Both calls are
//! fire-and-forget from the client's perspective: a failed check routes
//! the user to "not found", never to a retry loop.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use copad_types::SessionId;

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Errors from the session bootstrap API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response not read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an unexpected body.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session_id: String,
}

/// Client for the backend's session REST endpoints.
#[derive(Debug, Clone)]
pub struct SessionApi {
    base_url: String,
    http: reqwest::Client,
}

impl SessionApi {
    /// Create an API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Mint a new session and return its id.
    pub async fn create_session(&self) -> Result<SessionId, ApiError> {
        let url = format!("{}/api/sessions", self.base_url);
        let response = self.http.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedResponse(format!("HTTP {status}")));
        }

        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::UnexpectedResponse(e.to_string()))?;

        debug!(session = %body.session_id, "minted session");
        Ok(SessionId::new(body.session_id))
    }

    /// Check whether a session exists.
    ///
    /// `Ok(false)` means the backend answered non-2xx; a network failure
    /// is an `Err`. Callers treat both as "not found"; there is no retry
    /// at this layer.
    pub async fn session_exists(&self, session_id: &SessionId) -> Result<bool, ApiError> {
        let url = format!("{}/api/sessions/{}", self.base_url, session_id);
        let response = self.http.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}
