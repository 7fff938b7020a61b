//! HTTP client wrapper with rate limiting

use crate::error::{Error, Result};
use governor::{Quota, RateLimiter};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Rate limiter shared by every clone of an [`HttpClient`]
pub type ApiRateLimiter = Arc<
    RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
>;

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// HTTP client wrapper for GitHub API requests with optional rate limiting
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    rate_limiter: Option<ApiRateLimiter>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration (no rate limiting)
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            rate_limiter: None,
        })
    }

    /// Create a new HTTP client with rate limiting
    ///
    /// # Arguments
    ///
    /// * `requests_per_second` - Maximum requests per second; `0` disables limiting
    pub fn with_rate_limit(requests_per_second: u32) -> Result<Self> {
        let rate_limiter = NonZeroU32::new(requests_per_second)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));

        Ok(Self {
            client: build_client()?,
            rate_limiter,
        })
    }

    /// Wait for rate limiter if enabled
    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
    }

    /// Start a request carrying the GitHub headers and a bearer token
    pub fn request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    /// Send a request and fail on non-success statuses
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.wait_for_rate_limit().await;

        let response = request.send().await?;
        let url = response.url().to_string();
        let status = response.status();
        debug!(%url, status = status.as_u16(), "GitHub API response");

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting (HTTP 429, or 403 once the hourly quota is gone)
        let quota_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .is_some_and(|remaining| remaining == "0");
        if status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && quota_exhausted)
        {
            warn!(%url, "GitHub rate limit exceeded");
            return Err(Error::RateLimitExceeded(url));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(url));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|error| error.message)
            .unwrap_or(url);
        Err(Error::GitHubApi {
            status: status.as_u16(),
            message,
        })
    }

    /// Send a request and deserialize the JSON response
    pub async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Send a request and return the raw response body
    pub async fn send_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(format!("nugget/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?)
}
