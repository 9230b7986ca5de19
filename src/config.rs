//! Client configuration

use crate::tvmaze::TvMazeError;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

/// Root of the public TVMaze API
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// How long a single request may take before it fails
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// A header identifying the client, sent with every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeader {
    pub name: String,
    pub value: String,
}

impl IdentityHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `User-Agent: tvmaze_client/<version>`
    pub fn user_agent() -> Self {
        Self::new(
            "User-Agent",
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )
    }
}

/// Settings for [`TvMazeClient`](crate::TvMazeClient)
///
/// Start from `ClientConfig::default()` and adjust with the `with_*` methods:
///
/// ```
/// use tvmaze_client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_region("CA")
///     .with_cache_file("/tmp/tvmaze.json");
/// assert_eq!(config.region.as_deref(), Some("CA"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root URL all request paths are appended to
    pub base_url: String,
    /// Preferred two-letter country code for show resolution
    pub region: Option<String>,
    /// Answer requests from the cache when a live entry exists
    pub use_cache: bool,
    pub timeout: Duration,
    pub identity_header: Option<IdentityHeader>,
    /// Snapshot file the cache is loaded from and written back to
    pub cache_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            region: None,
            use_cache: true,
            timeout: DEFAULT_TIMEOUT,
            identity_header: Some(IdentityHeader::user_agent()),
            cache_file: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the identifying header, `None` sends no extra header
    pub fn with_identity_header(mut self, header: Option<IdentityHeader>) -> Self {
        self.identity_header = header;
        self
    }

    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Parses and validates the base URL
    ///
    /// The URL must be absolute and able to carry a path (`http`/`https`).
    pub(crate) fn parsed_base_url(&self) -> Result<Url, TvMazeError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            TvMazeError::Configuration(format!("base URL {:?}: {}", self.base_url, e))
        })?;

        if url.cannot_be_a_base() {
            return Err(TvMazeError::Configuration(format!(
                "base URL {:?} cannot carry a path",
                self.base_url
            )));
        }

        Ok(url)
    }
}
