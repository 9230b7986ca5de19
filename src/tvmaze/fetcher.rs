//! Cache-aware fetching of TVMaze resources
//!
//! The fetcher builds canonical request URLs and answers requests from the
//! shared [`CacheStore`] when it can, falling back to the [`Transport`]
//! otherwise. The canonical URL doubles as the cache key.

use super::{Transport, TvMazeError};
use crate::cache::CacheStore;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Fetches raw resources through the response cache.
pub struct Fetcher {
    base_url: Url,
    cache: Arc<CacheStore>,
    transport: Box<dyn Transport>,
}

impl Fetcher {
    /// Creates a fetcher for the service rooted at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the API, e.g. `https://api.tvmaze.com`
    /// * `cache` - Response cache, possibly shared with other fetchers
    /// * `transport` - Performs the actual GET requests
    pub fn new(base_url: Url, cache: Arc<CacheStore>, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url,
            cache,
            transport,
        }
    }

    /// Returns the API root every request URL is built from
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the cache responses are stored in
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Builds the canonical URL for a resource below the base URL
    ///
    /// Path segments are percent-encoded individually and appended to the
    /// base path. Query pairs are sorted by key (keeping the given order for
    /// repeated keys) and form-urlencoded, so logically identical requests
    /// always produce the same string.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let url = fetcher.request_url(&["search", "shows"], &[("q", "Lost Girl")])?;
    /// assert_eq!(url.as_str(), "https://api.tvmaze.com/search/shows?q=Lost+Girl");
    /// ```
    pub fn request_url(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, TvMazeError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                TvMazeError::Configuration(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }

        if !query.is_empty() {
            let mut pairs = query.to_vec();
            pairs.sort_by_key(|(key, _)| *key);
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    /// Returns the body of the resource at `url`
    ///
    /// With `use_cache` set, a live cache entry is returned without touching
    /// the network. Otherwise the resource is requested and, on 200 OK, the
    /// body replaces whatever the cache held for `url`.
    ///
    /// # Errors
    ///
    /// * [`TvMazeError::Transport`] if the request could not be completed
    /// * [`TvMazeError::HttpStatus`] if the service answered with anything but 200
    pub fn fetch(&self, url: &Url, use_cache: bool) -> Result<Vec<u8>, TvMazeError> {
        let key = url.as_str();

        if use_cache {
            if let Some(body) = self.cache.get(key) {
                tracing::debug!(url = key, "cache hit");
                return Ok(body);
            }
        }

        tracing::debug!(url = key, use_cache, "cache miss");

        let response = self.transport.get(url)?;

        if response.status != StatusCode::OK {
            return Err(TvMazeError::HttpStatus {
                status: response.status.as_u16(),
                reason: response
                    .status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }

        self.cache.set(key, response.body.clone(), None);
        Ok(response.body)
    }

    /// Fetches the resource at `url` and decodes it as JSON
    pub fn fetch_json<T>(&self, url: &Url, use_cache: bool) -> Result<T, TvMazeError>
    where
        T: DeserializeOwned,
    {
        let body = self.fetch(url, use_cache)?;

        serde_json::from_slice(&body).map_err(|e| TvMazeError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}
