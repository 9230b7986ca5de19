//! TVMaze client: cached fetching, show resolution and episode listing.
//!
//! The pieces are layered leaf first: a [`Transport`] performs raw GET
//! requests, the [`Fetcher`] puts the response cache in front of it, and the
//! [`SearchResolver`] and [`EpisodeLister`] decode what the fetcher returns.
//! [`TvMazeClient`] wires everything together from a `ClientConfig`.
mod client;
mod episodes;
mod fetcher;
mod search;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::TvMazeClient;
pub use episodes::EpisodeLister;
pub use fetcher::Fetcher;
pub use search::{SearchResolver, select_show};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::{
    Candidate, Country, Episode, Externals, Image, Link, Links, Network, Rating, Schedule, Show,
};

use crate::cache::CacheError;
use thiserror::Error;

/// Errors that can occur while talking to TVMaze.
#[derive(Debug, Error)]
pub enum TvMazeError {
    /// The request could not be sent or its response could not be read
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with a status other than 200 OK
    #[error("Request failed: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// The response body does not have the expected JSON shape
    #[error("Failed to parse API response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// Loading or saving the response cache failed
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// No search result matched the requested show name
    #[error("Failed to match show in TVMaze: {0}")]
    ShowNotFound(String),

    /// The client was configured with an unusable value
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
