//! GitLab API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Resource operations live in [`crate::api`] and reach the network through
//! the [`Transport`] implementation below.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use crate::api::GroupIterations;
use crate::error::{GitLabError, Result};
use crate::query::encode_query;
use crate::transport::{Method, Payload, Transport};

const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";
const USER_AGENT: &str = concat!("gitlabapi/", env!("CARGO_PKG_VERSION"));

/// Low-level GitLab API client.
///
/// Handles authentication and HTTP requests. Resource-specific operations
/// are exposed through endpoint types such as [`GroupIterations`].
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use gitlabapi::GitLabClient;
///
/// # async fn example() -> gitlabapi::Result<()> {
/// // Create from environment variables
/// let client = GitLabClient::from_env()?;
///
/// // Or configure manually
/// let client = GitLabClient::new("glpat-xxxx", "https://gitlab.example.com/api/v4")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitLabClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GitLabClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GITLAB_TOKEN` for authentication and optionally `GITLAB_URL`
    /// for the API base URL (defaults to `https://gitlab.com/api/v4`).
    ///
    /// # Errors
    ///
    /// Returns an error if `GITLAB_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("GITLAB_TOKEN").map_err(|_| {
            GitLabError::ConfigMissing("GITLAB_TOKEN environment variable not set".to_string())
        })?;

        let base_url = env::var("GITLAB_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access or OAuth token
    /// * `base_url` - API base URL including the version (e.g., `https://gitlab.com/api/v4`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Relative joins drop the last segment unless the base ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(GitLabError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Group iterations endpoint backed by this client.
    pub fn group_iterations(&self) -> GroupIterations<'_> {
        GroupIterations::new(self)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.send(Method::Get, path, &Payload::new()).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query(&self, path: &str, query: &Payload) -> Result<Response> {
        self.send(Method::Get, path, query).await
    }

    /// Make a PUT request, with a JSON body when `body` is non-empty.
    #[tracing::instrument(skip(self, body))]
    pub async fn put(&self, path: &str, body: &Payload) -> Result<Response> {
        self.send(Method::Put, path, body).await
    }

    /// Make a POST request, with a JSON body when `body` is non-empty.
    #[tracing::instrument(skip(self, body))]
    pub async fn post(&self, path: &str, body: &Payload) -> Result<Response> {
        self.send(Method::Post, path, body).await
    }

    /// Make a DELETE request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn delete(&self, path: &str, query: &Payload) -> Result<Response> {
        self.send(Method::Delete, path, query).await
    }

    /// Place the payload in the query string or the JSON body, depending on the verb.
    async fn send(&self, method: Method, path: &str, payload: &Payload) -> Result<Response> {
        let request = if method.sends_query() {
            let url = self.url_with_query(path, payload)?;
            self.http.request(method.into(), url)
        } else {
            let url = self.base_url.join(path)?;
            Self::with_json_body(self.http.request(method.into(), url), payload)
        };
        self.execute(request).await
    }

    fn url_with_query(&self, path: &str, query: &Payload) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.set_query(Some(&encode_query(query)));
        }
        Ok(url)
    }

    /// Attach a JSON body, leaving out `null` fields. Empty bodies are not sent.
    fn with_json_body(request: RequestBuilder, body: &Payload) -> RequestBuilder {
        let body: Payload = body
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if body.is_empty() {
            request
        } else {
            request.json(&body)
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(GitLabError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(GitLabError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        tracing::debug!(status = status.as_u16(), %message, "request rejected");
        Err(GitLabError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if body.trim().is_empty() {
            return format!("HTTP {status}");
        }

        // GitLab reports either a string or a field -> errors map under "message"
        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            match json.get("message") {
                Some(Value::String(msg)) => return msg.clone(),
                Some(structured) => return structured.to_string(),
                None => {}
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        body
    }

    /// Decode a successful response body.
    ///
    /// Empty bodies (such as `204 No Content`) decode to `null`, non-JSON
    /// bodies to a string.
    async fn decode_body(response: Response) -> Result<Value> {
        let body = response.text().await.map_err(GitLabError::HttpError)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(body)),
        }
    }
}

#[async_trait]
impl Transport for GitLabClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> Result<Value> {
        tracing::debug!(%method, path, "sending request");

        let empty = Payload::new();
        let response = self.send(method, path, payload.unwrap_or(&empty)).await?;

        Self::decode_body(response).await
    }
}
