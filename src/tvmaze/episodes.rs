//! Episode listing for resolved shows.
use super::{Episode, Fetcher, TvMazeError};

/// Lists the episodes of a show.
pub struct EpisodeLister<'a> {
    fetcher: &'a Fetcher,
    use_cache: bool,
}

impl<'a> EpisodeLister<'a> {
    pub fn new(fetcher: &'a Fetcher, use_cache: bool) -> Self {
        Self { fetcher, use_cache }
    }

    /// Fetches all episodes of the show with the given TVMaze id
    ///
    /// The episodes keep the order the service returns them in, which is
    /// season and episode number ascending.
    pub fn list(&self, show_id: u64) -> Result<Vec<Episode>, TvMazeError> {
        let id = show_id.to_string();
        let url = self
            .fetcher
            .request_url(&["shows", id.as_str(), "episodes"], &[])?;

        self.fetcher.fetch_json(&url, self.use_cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::tvmaze::testing::ScriptedTransport;
    use reqwest::{StatusCode, Url};
    use std::sync::Arc;

    const EPISODES_URL: &str = "https://api.tvmaze.com/shows/1/episodes";

    fn fetcher_with(transport: ScriptedTransport) -> Fetcher {
        let base = Url::parse("https://api.tvmaze.com").unwrap();
        Fetcher::new(base, Arc::new(CacheStore::default()), Box::new(transport))
    }

    #[test]
    fn test_list_decodes_in_service_order() {
        let body = r#"[
            {"id": 12, "name": "Pilot", "season": 1, "number": 1, "airdate": "2008-09-09",
             "airtime": "21:00", "airstamp": "2008-09-10T01:00:00+00:00", "runtime": 60,
             "summary": "<p>An airplane lands.</p>"},
            {"id": 14, "name": "Special", "season": 0, "number": null},
            {"id": 13, "name": "The Same Old Story", "season": 1, "number": 2}
        ]"#;
        let fetcher = fetcher_with(ScriptedTransport::new().ok(EPISODES_URL, body));

        let episodes = EpisodeLister::new(&fetcher, true).list(1).unwrap();

        let ids: Vec<u64> = episodes.iter().map(|episode| episode.id).collect();
        assert_eq!(ids, vec![12, 14, 13]);
        assert_eq!(episodes[0].name.as_deref(), Some("Pilot"));
        assert_eq!(episodes[0].number, Some(1));
        assert_eq!(episodes[1].number, None);
    }

    #[test]
    fn test_list_uses_cache_on_second_call() {
        let transport = ScriptedTransport::new().ok(EPISODES_URL, "[]");
        let calls = transport.call_log();
        let fetcher = fetcher_with(transport);
        let lister = EpisodeLister::new(&fetcher, true);

        assert!(lister.list(1).unwrap().is_empty());
        assert!(lister.list(1).unwrap().is_empty());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_list_decode_error() {
        let fetcher = fetcher_with(ScriptedTransport::new().ok(EPISODES_URL, r#"{"id": 1}"#));

        let result = EpisodeLister::new(&fetcher, true).list(1);
        assert!(matches!(result, Err(TvMazeError::Decode { .. })));
    }

    #[test]
    fn test_list_unknown_show() {
        let url = "https://api.tvmaze.com/shows/999999/episodes";
        let fetcher = fetcher_with(ScriptedTransport::new().status(url, StatusCode::NOT_FOUND));

        let result = EpisodeLister::new(&fetcher, true).list(999999);
        match result {
            Err(TvMazeError::HttpStatus { status, reason }) => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected HttpStatus error, got {:?}", other),
        }
    }
}
