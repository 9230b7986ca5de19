//! tvmaze_client - A blocking TVMaze client with a persistent response cache
//!
//! This library resolves human-typed show names to TVMaze shows, lists their
//! episodes, and keeps every response in an expiring on-disk cache so that
//! repeated lookups do not hit the network.
//!
//! # Examples
//!
//! ```no_run
//! use tvmaze_client::{ClientConfig, TvMazeClient};
//!
//! let config = ClientConfig::default()
//!     .with_region("US")
//!     .with_cache_file("/tmp/tvmaze.json");
//! let client = TvMazeClient::new(config)?;
//!
//! let show = client.find_show("Fringe")?;
//! for episode in client.episodes(show.id)? {
//!     println!("S{:02}E{:02}", episode.season, episode.number.unwrap_or(0));
//! }
//!
//! client.write_cache()?;
//! # Ok::<(), tvmaze_client::TvMazeError>(())
//! ```

mod cache;
mod config;
mod tvmaze;

// Re-export error types
pub use cache::CacheError;
pub use tvmaze::TvMazeError;

pub use cache::{CacheStore, DEFAULT_CLEANUP_INTERVAL, DEFAULT_TTL, default_cache_path};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, IdentityHeader};
pub use tvmaze::{
    Candidate, Country, Episode, EpisodeLister, Externals, Fetcher, HttpResponse, Image, Link,
    Links, Network, Rating, ReqwestTransport, Schedule, SearchResolver, Show, Transport,
    TvMazeClient, select_show,
};
