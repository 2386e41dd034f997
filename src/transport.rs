//! The HTTP transport seam.
//!
//! Resource endpoints never talk to the network directly; they hand a verb,
//! a path and an optional payload to a [`Transport`]. [`GitLabClient`]
//! is the reqwest-backed implementation.
//!
//! [`GitLabClient`]: crate::GitLabClient

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{GitLabError, Result};
use crate::options::ValueType;

/// Key/value parameters sent with a request.
///
/// For `GET` and `DELETE` they become the query string, for `POST` and
/// `PUT` the JSON body.
pub type Payload = serde_json::Map<String, Value>;

/// Serialize caller parameters into a [`Payload`].
///
/// Anything that serializes to a JSON object is accepted; `null` (including
/// `()` and `None`) yields an empty payload.
///
/// # Errors
///
/// Returns [`GitLabError::InvalidParameters`] for non-object values.
pub fn to_payload<P: Serialize + ?Sized>(params: &P) -> Result<Payload> {
    match serde_json::to_value(params)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Payload::new()),
        other => Err(GitLabError::InvalidParameters(format!(
            "expected a key/value mapping, got {}",
            ValueType::of(&other)
        ))),
    }
}

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the payload travels in the query string rather than the body.
    pub const fn sends_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Performs API requests.
///
/// Implementations own connection handling, authentication and response
/// decoding. The returned value is the decoded response body and is passed
/// back to callers untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP verb
    /// * `path` - Path relative to the API base URL, already encoded
    /// * `payload` - Query parameters or body, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the API rejects it.
    async fn request(&self, method: Method, path: &str, payload: Option<&Payload>)
        -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> Result<Value> {
        (**self).request(method, path, payload).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Payload>,
    ) -> Result<Value> {
        (**self).request(method, path, payload).await
    }
}
