//! HTTP transport used by the fetcher
//!
//! The [`Transport`] trait is the seam between the cache-aware fetch logic and
//! the network, so the rest of the client can run against a scripted
//! transport in tests.

use super::TvMazeError;
use crate::config::IdentityHeader;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// The full response body, empty unless the status is 200 OK
    pub body: Vec<u8>,
}

/// Performs a single HTTP GET request.
///
/// Implementors must report connection, timeout and body-read failures as
/// [`TvMazeError::Transport`] and hand every received status back in the
/// [`HttpResponse`] unchanged. Status handling is the caller's job.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<HttpResponse, TvMazeError>;
}

/// Transport backed by a blocking `reqwest` client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given request timeout
    ///
    /// If `identity` is set, the header is attached to every request.
    pub fn new(timeout: Duration, identity: Option<&IdentityHeader>) -> Result<Self, TvMazeError> {
        let mut headers = HeaderMap::new();

        if let Some(identity) = identity {
            let name = HeaderName::from_bytes(identity.name.as_bytes()).map_err(|e| {
                TvMazeError::Configuration(format!("header name {:?}: {}", identity.name, e))
            })?;
            let value = HeaderValue::from_str(&identity.value).map_err(|e| {
                TvMazeError::Configuration(format!("header value {:?}: {}", identity.value, e))
            })?;
            headers.insert(name, value);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TvMazeError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TvMazeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| TvMazeError::Transport(e.to_string()))?;

        let status = response.status();

        // Error bodies are never used, skip reading them
        if status != StatusCode::OK {
            return Ok(HttpResponse {
                status,
                body: Vec::new(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| TvMazeError::Transport(e.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}
