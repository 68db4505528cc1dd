use std::env;
use std::time::Duration;

use crate::error::{SyncError, SyncResult};

/// Environment variable names - single source of truth
pub mod env_vars {
    /// Base URL of the notes API; note routes are resolved below it (`{url}/notes`).
    pub const API_URL: &str = "NOTES_API_URL";
    /// Optional per-request timeout in seconds. Unset means requests never time out.
    pub const REQUEST_TIMEOUT_SECS: &str = "NOTES_REQUEST_TIMEOUT_SECS";
}

/// Default values
pub mod defaults {
    pub const API_URL: &str = "http://localhost:8080/api";
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: defaults::API_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> SyncResult<Self> {
        let api_url = env::var(env_vars::API_URL)
            .unwrap_or_else(|_| defaults::API_URL.to_string());

        let request_timeout = env::var(env_vars::REQUEST_TIMEOUT_SECS)
            .ok()
            .and_then(|raw| parse_timeout(&raw));

        Self::new(&api_url).map(|cfg| cfg.with_timeout(request_timeout))
    }

    pub fn new(api_url: &str) -> SyncResult<Self> {
        let api_url = api_url.trim().trim_end_matches('/');
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "{} must be an http(s) URL, got '{}'",
                env_vars::API_URL,
                api_url
            )));
        }

        Ok(Self {
            api_url: api_url.to_string(),
            request_timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// URL of the note collection
    pub fn notes_url(&self) -> String {
        format!("{}/notes", self.api_url)
    }

    /// URL of a single note
    pub fn note_url(&self, id: i64) -> String {
        format!("{}/notes/{}", self.api_url, id)
    }
}

fn parse_timeout(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(e) => {
            log::warn!(
                "Ignoring invalid {} '{}': {}",
                env_vars::REQUEST_TIMEOUT_SECS,
                raw,
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let cfg = Config::new("http://notes.local:9000/api/").unwrap();
        assert_eq!(cfg.notes_url(), "http://notes.local:9000/api/notes");
        assert_eq!(cfg.note_url(42), "http://notes.local:9000/api/notes/42");
    }

    #[test]
    fn test_new_rejects_non_http_url() {
        let err = Config::new("ftp://notes.local").unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_default_has_no_timeout() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url, defaults::API_URL);
        assert!(cfg.request_timeout.is_none());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("soon"), None);
    }
}
