//! Remote execution service client.
//!
//! `go` and `java` have no in-process runtime; they are shipped to the
//! backend as a one-shot `POST /api/execute`. Deliberately no
//! client-side timeout: the request is cancelable only by dropping the
//! future, and a hung backend hangs the caller's "Running..." state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use copad_types::Language;

use crate::ExecOutcome;

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    code: &'a str,
    language: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the backend's execution endpoint.
#[derive(Debug, Clone)]
pub struct ExecService {
    base_url: String,
    http: reqwest::Client,
}

impl ExecService {
    /// Create a service client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Execute code remotely. Never fails; every failure mode is folded
    /// into the outcome's `error` field.
    pub async fn execute(&self, code: &str, language: Language) -> ExecOutcome {
        let url = format!("{}/api/execute", self.base_url);
        debug!(%language, %url, "delegating execution to service");

        let request = ExecuteRequest {
            code,
            language: language.as_str(),
        };

        let response = match self.http.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                return ExecOutcome::failure(format!(
                    "{language} execution error: {e}. Make sure the backend server is running."
                ));
            }
        };

        let status = response.status();
        if !status.is_success() {
            // A non-2xx body may still carry a useful error field.
            let message = response
                .json::<ExecuteResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return ExecOutcome::failure(message);
        }

        match response.json::<ExecuteResponse>().await {
            Ok(body) => match body.error {
                Some(error) if !error.is_empty() => ExecOutcome::failure(error),
                _ => ExecOutcome::success(body.output.unwrap_or_default()),
            },
            Err(e) => ExecOutcome::failure(format!("invalid response from execution service: {e}")),
        }
    }
}
