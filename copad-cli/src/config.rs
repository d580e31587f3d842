//! Configuration for copad-cli.
//!
//! The whole configuration surface is one base URL: flag beats the
//! `COPAD_BASE_URL` environment variable beats the localhost default.
//! The realtime endpoint is derived from it.

use copad_client::DEFAULT_BASE_URL;

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (REST and, derived, the realtime channel).
    pub base_url: String,
}

impl Config {
    /// Resolve the configuration from the flag and the environment.
    pub fn resolve(flag: Option<String>) -> Self {
        Self::resolve_from(flag, std::env::var("COPAD_BASE_URL").ok())
    }

    fn resolve_from(flag: Option<String>, env: Option<String>) -> Self {
        let base_url = flag
            .or(env)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self { base_url }
    }

    /// The realtime channel endpoint derived from the base URL.
    pub fn ws_url(&self) -> String {
        let ws_base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{}", self.base_url)
        };
        format!("{ws_base}/ws")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env_beats_default() {
        let config = Config::resolve_from(
            Some("http://flag:1".into()),
            Some("http://env:2".into()),
        );
        assert_eq!(config.base_url, "http://flag:1");

        let config = Config::resolve_from(None, Some("http://env:2".into()));
        assert_eq!(config.base_url, "http://env:2");

        let config = Config::resolve_from(None, None);
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = Config::resolve_from(Some("http://host:9/".into()), None);
        assert_eq!(config.base_url, "http://host:9");
    }

    #[test]
    fn ws_url_derivation() {
        let config = Config::resolve_from(None, None);
        assert_eq!(config.ws_url(), "ws://localhost:8000/ws");

        let config = Config::resolve_from(Some("https://pad.example.com".into()), None);
        assert_eq!(config.ws_url(), "wss://pad.example.com/ws");
    }
}
