//! TVMaze API response types.
//!
//! These structures mirror the JSON returned by the TVMaze API. Fields the
//! service may send as `null` are optional.
use serde::{Deserialize, Serialize};

/// A single result of the show search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Relevance score assigned by the service
    pub score: f64,
    /// The show this result refers to
    pub show: Show,
}

/// A TV show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    pub name: String,
    /// Scripted, Reality, Animation, ...
    #[serde(rename = "type")]
    pub show_type: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Running, Ended, To Be Determined, ...
    pub status: Option<String>,
    pub runtime: Option<u32>,
    /// Premiere date as `YYYY-MM-DD`
    pub premiered: Option<String>,
    pub schedule: Option<Schedule>,
    pub rating: Option<Rating>,
    pub weight: Option<u32>,
    /// Broadcast network, absent for web-only shows
    pub network: Option<Network>,
    /// Streaming service, absent for broadcast shows
    #[serde(rename = "webChannel")]
    pub web_channel: Option<Network>,
    pub externals: Option<Externals>,
    pub image: Option<Image>,
    /// Summary in HTML format
    pub summary: Option<String>,
    /// Unix timestamp of the last change
    pub updated: Option<i64>,
    #[serde(rename = "_links")]
    pub links: Option<Links>,
}

impl Show {
    /// Country code of the broadcasting network, if known
    pub fn country_code(&self) -> Option<&str> {
        self.network
            .as_ref()
            .and_then(|network| network.country.as_ref())
            .map(|country| country.code.as_str())
    }

    /// The summary with HTML markup removed
    pub fn summary_text(&self) -> Option<String> {
        self.summary.as_deref().map(html_to_text)
    }
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    #[serde(default)]
    pub url: String,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Season number (0 for specials)
    pub season: u32,
    /// Episode number within the season, null for specials
    pub number: Option<u32>,
    /// Air date as `YYYY-MM-DD`
    pub airdate: Option<String>,
    /// Local air time as `HH:MM`
    pub airtime: Option<String>,
    /// Air time as an ISO 8601 timestamp
    pub airstamp: Option<String>,
    pub runtime: Option<u32>,
    pub image: Option<Image>,
    /// Episode summary in HTML format (may be null)
    pub summary: Option<String>,
    #[serde(rename = "_links")]
    pub links: Option<Links>,
}

impl Episode {
    /// The summary with HTML markup removed
    pub fn summary_text(&self) -> Option<String> {
        self.summary.as_deref().map(html_to_text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: Option<f64>,
}

/// A broadcast network or web channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: u64,
    pub name: String,
    pub country: Option<Country>,
}

/// The country a network broadcasts in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    /// Two-letter country code, e.g. `US`
    pub code: String,
    pub timezone: String,
}

/// Identifiers of the show in other databases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Externals {
    pub tvrage: Option<u64>,
    pub thetvdb: Option<u64>,
    pub imdb: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub medium: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Option<Link>,
    #[serde(rename = "previousepisode")]
    pub previous_episode: Option<Link>,
    #[serde(rename = "nextepisode")]
    pub next_episode: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

fn html_to_text(html: &str) -> String {
    nanohtml2text::html2text(html).trim().to_string()
}
