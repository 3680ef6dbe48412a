//! Configuration module
//!
//! Client settings are read once from the environment and then passed
//! explicitly to the API client and the transport factory.

use std::env;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const HTTP_TIMEOUT_SECS: u64 = 60;
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Settings for talking to the storefront backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without trailing slash
    pub api_url: String,
    /// Serve catalog reads and uploads from in-memory fakes instead of the network
    pub mock_mode: bool,
    pub http_timeout_secs: u64,
    /// Size of the body chunks handed to the HTTP client during artifact upload;
    /// progress is reported once per chunk
    pub upload_chunk_size: usize,
    /// Pre-issued session cookie (`name=value`) for non-interactive use
    pub session_cookie: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            mock_mode: false,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            upload_chunk_size: UPLOAD_CHUNK_SIZE,
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Create config from environment: KICKSTARTR_API_URL (or API_URL), KICKSTARTR_MOCK_MODE,
    /// KICKSTARTR_HTTP_TIMEOUT_SECS, KICKSTARTR_UPLOAD_CHUNK_SIZE, KICKSTARTR_SESSION_COOKIE.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("KICKSTARTR_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let mock_mode = env::var("KICKSTARTR_MOCK_MODE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let http_timeout_secs = env::var("KICKSTARTR_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("KICKSTARTR_HTTP_TIMEOUT_SECS must be a valid number"))?;

        let upload_chunk_size = env::var("KICKSTARTR_UPLOAD_CHUNK_SIZE")
            .unwrap_or_else(|_| UPLOAD_CHUNK_SIZE.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("KICKSTARTR_UPLOAD_CHUNK_SIZE must be a valid number"))?;

        let session_cookie = env::var("KICKSTARTR_SESSION_COOKIE")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let config = Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            mock_mode,
            http_timeout_secs,
            upload_chunk_size,
            session_cookie,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API URL must start with http:// or https:// (got '{}')",
                self.api_url
            ));
        }
        if self.upload_chunk_size == 0 {
            return Err(anyhow::anyhow!("Upload chunk size must be greater than zero"));
        }
        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }
        Ok(())
    }

    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    pub fn with_upload_chunk_size(mut self, size: usize) -> Self {
        self.upload_chunk_size = size;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
