//! HTTP client for the Kickstartr storefront API.
//!
//! Provides a cookie-session client with generic GET/POST helpers, the
//! storefront domain methods (catalog, comments, profile, admin creation) and
//! the artifact upload calls. `ApiClient` implements
//! [`kickstartr_publish::ArtifactTransport`]; [`transport_for`] picks it or the
//! in-memory mock depending on configuration.

pub mod api;
pub mod catalog;
pub mod upload;

use anyhow::{Context, Result};
use kickstartr_core::{ApiError, ApiResult, ClientConfig};
use kickstartr_publish::{ArtifactTransport, MockTransport};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub use catalog::Catalog;

/// HTTP client for the storefront API with a cookie-backed session.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    cookies: Arc<Jar>,
    base_url: String,
    upload_chunk_size: usize,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.api_url.trim_end_matches('/').to_string();

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = &config.session_cookie {
            let url: Url = base_url
                .parse()
                .with_context(|| format!("Invalid API URL: {}", base_url))?;
            for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &url);
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .cookie_provider(jar.clone())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            cookies: jar,
            base_url,
            upload_chunk_size: config.upload_chunk_size,
        })
    }

    /// Create client from environment. See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Cookies the session currently sends to the API, as a `Cookie` header value.
    pub fn session_cookie(&self) -> Option<String> {
        let url: Url = self.base_url.parse().ok()?;
        let value = self.cookies.cookies(&url)?;
        value.to_str().ok().map(str::to_string)
    }

    pub(crate) fn upload_chunk_size(&self) -> usize {
        self.upload_chunk_size
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        decode_json(ensure_success(response).await?).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        decode_json(ensure_success(response).await?).await
    }

    /// POST JSON body, ignoring any response body.
    pub async fn post_json_no_content<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        let url = self.build_url(path);
        tracing::debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        Ok(())
    }
}

/// Pick the publish transport: in-memory mock or the real API.
pub fn transport_for(config: &ClientConfig) -> Result<Arc<dyn ArtifactTransport>> {
    if config.mock_mode {
        tracing::info!("Mock mode enabled, uploads stay in memory");
        return Ok(Arc::new(MockTransport::with_chunk_size(
            config.upload_chunk_size,
        )));
    }
    Ok(Arc::new(ApiClient::new(config)?))
}

pub(crate) fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Turn a non-2xx response into `ApiError::Http`, keeping any ProblemDetails body.
pub(crate) async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = ApiError::from_response(status.as_u16(), &body);
    tracing::warn!(status = status.as_u16(), error = %error, "API request failed");
    Err(error)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let body = response.text().await.map_err(transport_error)?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

// Re-export domain types for convenience.
pub use kickstartr_core::models::{
    BundleDto, TagDto, TemplateDetailDto, TemplateListItemDto, UserDto, UserProfile,
};
