//! TVMaze client facade.
use super::{
    Candidate, Episode, EpisodeLister, Fetcher, ReqwestTransport, SearchResolver, Show, Transport,
    TvMazeError,
};
use crate::cache::CacheStore;
use crate::config::ClientConfig;
use std::sync::Arc;

/// Client for the TVMaze API.
///
/// Resolves show names and lists episodes, answering repeated requests from
/// a persistent response cache. The cache is only written to disk when
/// [`TvMazeClient::write_cache`] is called.
pub struct TvMazeClient {
    config: ClientConfig,
    fetcher: Fetcher,
}

impl TvMazeClient {
    /// Creates a client that talks to the network through `reqwest`
    ///
    /// If the config names a cache file, it is loaded now. A missing file
    /// just means an empty cache.
    pub fn new(config: ClientConfig) -> Result<Self, TvMazeError> {
        let transport = ReqwestTransport::new(config.timeout, config.identity_header.as_ref())?;
        Self::with_transport(config, Box::new(transport))
    }

    /// Creates a client with a custom transport
    pub fn with_transport(
        config: ClientConfig,
        transport: Box<dyn Transport>,
    ) -> Result<Self, TvMazeError> {
        let cache = match &config.cache_file {
            Some(path) => CacheStore::open(path)?,
            None => CacheStore::default(),
        };
        Self::with_cache(config, Arc::new(cache), transport)
    }

    /// Creates a client around an existing, possibly shared, cache
    ///
    /// The config's `cache_file` is ignored; the cache persists to its own
    /// backing file.
    pub fn with_cache(
        config: ClientConfig,
        cache: Arc<CacheStore>,
        transport: Box<dyn Transport>,
    ) -> Result<Self, TvMazeError> {
        let base_url = config.parsed_base_url()?;
        Ok(Self {
            fetcher: Fetcher::new(base_url, cache, transport),
            config,
        })
    }

    /// Returns the configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the response cache shared with the fetcher
    pub fn cache(&self) -> &Arc<CacheStore> {
        self.fetcher.cache()
    }

    /// Resolves `show_name` to a single show, preferring the configured region
    pub fn find_show(&self, show_name: &str) -> Result<Show, TvMazeError> {
        self.resolver()
            .resolve(show_name, self.config.region.as_deref())
    }

    /// Returns the raw search candidates for `show_name` in rank order
    pub fn search_shows(&self, show_name: &str) -> Result<Vec<Candidate>, TvMazeError> {
        self.resolver().search(show_name)
    }

    /// Lists all episodes of the show with the given id
    pub fn episodes(&self, show_id: u64) -> Result<Vec<Episode>, TvMazeError> {
        EpisodeLister::new(&self.fetcher, self.config.use_cache).list(show_id)
    }

    /// Persists the response cache to its backing file
    pub fn write_cache(&self) -> Result<(), TvMazeError> {
        self.fetcher.cache().save()?;
        Ok(())
    }

    fn resolver(&self) -> SearchResolver<'_> {
        SearchResolver::new(&self.fetcher, self.config.use_cache)
    }
}
