use crate::error::RadarError;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Status code plus decoded JSON body.
/// Non-2xx bodies are not decoded; the fetcher only looks at the status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Value::Null,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The interface to the GitHub REST API.
/// `path` is relative to the API root, e.g. `/repos/octo/folio/languages`.
#[async_trait]
pub trait GithubApi: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse, RadarError>;
}

/// reqwest-backed client. Token is optional; without it GitHub applies the
/// anonymous rate limit.
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl GithubClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("folio-ship-radar"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse, RadarError> {
        let raw = format!("{}{}", self.base_url, path);
        let url = Url::parse_with_params(&raw, query.iter())
            .map_err(|e| RadarError::Transport(format!("bad url {}: {}", raw, e)))?;

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RadarError::Transport(e.to_string()))?;

        let status = resp.status();
        debug!("GET {} -> {}", path, status);

        if !status.is_success() {
            return Ok(ApiResponse::status(status.as_u16()));
        }

        let body = resp.json::<Value>().await.map_err(|e| RadarError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}
