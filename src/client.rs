//! Provider API client.
//!
//! Low-level, read-only HTTP client that handles authentication and error
//! mapping for one provider API. Endpoint-specific fetching is implemented
//! via the `Fetch` and `List` traits on the model types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::HarvestConfig;
use crate::error::{HarvestError, Result};
use crate::pagination::{Page, PageLinks, PaginationParams};
use crate::reference::{ProviderKind, RepositoryReference};

pub(crate) const USER_AGENT: &str = concat!("githublab-harvest/", env!("CARGO_PKG_VERSION"));
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITLAB_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Read-only client for the GitHub or GitLab REST API.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use githublab_harvest::{ProviderClient, ProviderKind};
/// use std::time::Duration;
///
/// # fn example() -> githublab_harvest::Result<()> {
/// let client = ProviderClient::new(
///     ProviderKind::GitHub,
///     "https://api.github.com",
///     None,
///     Duration::from_secs(30),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    base_url: Arc<Url>,
    provider: ProviderKind,
    token: Option<String>,
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ProviderClient {
    /// Create a client for the API that serves `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn for_reference(reference: &RepositoryReference, config: &HarvestConfig) -> Result<Self> {
        match reference.provider {
            ProviderKind::GitHub => Self::new(
                ProviderKind::GitHub,
                config.github_api_url(),
                config.github_token(),
                config.timeout(),
            ),
            ProviderKind::GitLab => Self::new(
                ProviderKind::GitLab,
                &config.gitlab_api_url(&reference.origin()),
                config.gitlab_token(),
                config.timeout(),
            ),
        }
    }

    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `provider` - Which API dialect to speak (auth header, accept header)
    /// * `base_url` - API root, e.g. `https://api.github.com` or `https://gitlab.com/api/v4`
    /// * `token` - Optional access token
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(
        provider: ProviderKind,
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let mut headers = HeaderMap::new();
        if provider == ProviderKind::GitHub {
            headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            provider,
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Whether requests carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self), fields(provider = %self.provider))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self.authorize(self.http.get(url)).send().await?;
        Self::check_response(response).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query), fields(provider = %self.provider))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self
            .authorize(self.http.get(url))
            .query(query)
            .send()
            .await?;
        Self::check_response(response).await
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;
        Self::decode(response).await
    }

    /// GET a path with query parameters and decode the JSON body.
    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.get_with_query(path, query).await?;
        Self::decode(response).await
    }

    /// GET one page of a list endpoint.
    ///
    /// Whether more pages follow is read from the provider's paging headers.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>> {
        let params = PaginationParams::for_page(page, per_page);
        let response = self.get_with_query(path, &params).await?;
        let links = PageLinks::from_headers(response.headers());
        let items: Vec<T> = Self::decode(response).await?;
        Ok(Page::with_links(items, page, per_page, links))
    }

    /// GET a path whose absence is a normal outcome.
    ///
    /// A 404 yields `Ok(None)`; every other failure is an error.
    pub async fn get_optional_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.get_json(path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.status_code() == Some(404) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match (&self.token, self.provider) {
            (Some(token), ProviderKind::GitHub) => request.bearer_auth(token),
            (Some(token), ProviderKind::GitLab) => request.header(GITLAB_TOKEN_HEADER, token),
            (None, _) => request,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Check response status and convert errors.
    pub(crate) async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if let Some(message) = Self::rate_limit_message(&response) {
            return Err(HarvestError::status(status.as_u16(), message));
        }

        let detail = Self::extract_error_message(response, status).await;
        let message = match status {
            StatusCode::UNAUTHORIZED => format!("authentication failed (HTTP 401): {detail}"),
            StatusCode::FORBIDDEN => format!("access denied (HTTP 403): {detail}"),
            _ => format!("HTTP {}: {detail}", status.as_u16()),
        };
        tracing::debug!(status = status.as_u16(), %message, "provider request failed");
        Err(HarvestError::status(status.as_u16(), message))
    }

    /// Detect GitHub's 403 rate limit and the generic 429.
    fn rate_limit_message(response: &Response) -> Option<String> {
        let headers = response.headers();
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let exhausted = response.status() == StatusCode::FORBIDDEN
            && header("x-ratelimit-remaining").as_deref() == Some("0");
        if !exhausted && response.status() != StatusCode::TOO_MANY_REQUESTS {
            return None;
        }

        Some(match header("retry-after") {
            Some(secs) => format!("rate limit exceeded, retry after {secs} seconds"),
            None => "rate limit exceeded; provide an access token to raise the limit".to_string(),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // Try to parse as JSON and extract message field
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        body
    }
}
