//! Client configuration loading: API endpoint, credentials and UI defaults.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the client looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/club.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TABLETOP_CLUB_CONFIG_PATH";
const API_URL_ENV: &str = "CLUB_API_URL";
const API_TOKEN_ENV: &str = "CLUB_API_TOKEN";
const TIMEOUT_ENV: &str = "CLUB_REQUEST_TIMEOUT_MS";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_NOTIFICATION_CAPACITY: usize = 32;
const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
/// Runtime configuration shared by the API client and the cache layer.
pub struct ClientConfig {
    /// Base URL every API route is resolved against.
    pub api_base_url: String,
    /// Bearer token issued by the authentication provider.
    pub access_token: Option<String>,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    /// Capacity of the toast broadcast channel.
    pub notification_capacity: usize,
    /// Rows per page used by data tables unless overridden.
    pub default_page_size: u32,
}

impl ClientConfig {
    /// Load the configuration from `path` (or the default location) and apply
    /// environment overrides. Missing or broken files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(resolve_config_path);

        let base = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded client config");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        base.with_overrides(|name| env::var(name).ok())
    }

    /// Apply `CLUB_*` overrides resolved through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|value| !value.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(API_TOKEN_ENV).filter(|value| !value.is_empty()) {
            self.access_token = Some(token);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(ms) => self.request_timeout = Duration::from_millis(ms),
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid {TIMEOUT_ENV}"),
            }
        }
        self
    }

    /// Point the client at another API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: None,
            request_timeout: DEFAULT_TIMEOUT,
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    api_base_url: Option<String>,
    access_token: Option<String>,
    request_timeout_ms: Option<u64>,
    notification_capacity: Option<usize>,
    default_page_size: Option<u32>,
}

impl From<RawConfig> for ClientConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: value.api_base_url.unwrap_or(defaults.api_base_url),
            access_token: value.access_token.or(defaults.access_token),
            request_timeout: value
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            notification_capacity: value
                .notification_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.notification_capacity),
            default_page_size: value
                .default_page_size
                .filter(|size| *size > 0)
                .unwrap_or(defaults.default_page_size),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{ "api_base_url": "https://club.example/api" }"#).unwrap();
        let config = ClientConfig::from(raw);
        assert_eq!(config.api_base_url, "https://club.example/api");
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let raw: RawConfig =
            serde_json::from_str(r#"{ "notification_capacity": 0, "default_page_size": 0 }"#)
                .unwrap();
        let config = ClientConfig::from(raw);
        assert_eq!(config.notification_capacity, DEFAULT_NOTIFICATION_CAPACITY);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn env_overrides_win() {
        let config = ClientConfig::default().with_overrides(|name| match name {
            API_URL_ENV => Some("https://override/api".into()),
            API_TOKEN_ENV => Some("secret".into()),
            TIMEOUT_ENV => Some("1500".into()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://override/api");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn invalid_timeout_override_is_ignored() {
        let config =
            ClientConfig::default().with_overrides(|name| (name == TIMEOUT_ENV).then(|| "soon".into()));
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = ClientConfig::load(Some(Path::new("does/not/exist.json")));
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
    }
}
