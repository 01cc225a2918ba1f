//! Client configuration
//!
//! The credential is an explicit value handed to the client constructor,
//! never read from ambient state at call sites. `from_env` is the single
//! place that touches the process environment (after loading a local `.env`
//! file if present, matching how the credential is provisioned in practice).

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "GRIST_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_VAR: &str = "GRIST_BASE_URL";

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://docs.getgrist.com/api";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`GristClient`](crate::GristClient)
#[derive(Debug, Clone)]
pub struct GristConfig {
    /// Bearer token for the Grist API
    pub api_key: String,
    /// Base URL of the API, without a trailing slash
    pub base_url: String,
    /// Timeout applied to each individual request
    pub timeout: Duration,
}

impl GristConfig {
    /// Configuration against the production endpoint with an explicit key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Configuration against a team subdomain, e.g. `qualcontabil` for
    /// `https://qualcontabil.getgrist.com/api`
    pub fn for_team(api_key: impl Into<String>, domain: &str) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: format!("https://{}.getgrist.com/api", domain),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the base URL, trimming any trailing slash
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url: String = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// Reads a local `.env` file first if one exists (existing environment
    /// variables win). Fails with an auth error naming `GRIST_API_KEY` when
    /// the key is missing or empty; no network call is ever attempted with
    /// an absent credential.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClientError::Auth(format!("{} is not set", API_KEY_VAR)))?;

        let config = match std::env::var(BASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::new(api_key).with_base_url(url.trim()),
            _ => Self::new(api_key),
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that mutate the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_explicit_key_does_not_touch_environment() {
        let config = GristConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_team_domain_base_url() {
        let config = GristConfig::for_team("k", "qualcontabil");
        assert_eq!(config.base_url, "https://qualcontabil.getgrist.com/api");
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = GristConfig::new("k").with_base_url("https://example.com/api/");
        assert_eq!(config.base_url, "https://example.com/api");
    }

    #[test]
    fn test_from_env_missing_key_names_variable() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(API_KEY_VAR);

        let err = GristConfig::from_env().unwrap_err();
        assert!(err.is_auth());
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn test_from_env_empty_key_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(API_KEY_VAR, "   ");

        let err = GristConfig::from_env().unwrap_err();
        assert!(err.is_auth());

        std::env::remove_var(API_KEY_VAR);
    }

    #[test]
    fn test_from_env_reads_key_and_base_url() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(API_KEY_VAR, "secret");
        std::env::set_var(BASE_URL_VAR, "https://team.getgrist.com/api/");

        let config = GristConfig::from_env().unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, "https://team.getgrist.com/api");

        std::env::remove_var(API_KEY_VAR);
        std::env::remove_var(BASE_URL_VAR);
    }
}
