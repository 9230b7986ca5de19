//! Show search and resolution of free-text show names.
use super::{Candidate, Fetcher, Show, TvMazeError};

/// Resolves human-typed show names to a single show.
pub struct SearchResolver<'a> {
    fetcher: &'a Fetcher,
    use_cache: bool,
}

impl<'a> SearchResolver<'a> {
    pub fn new(fetcher: &'a Fetcher, use_cache: bool) -> Self {
        Self { fetcher, use_cache }
    }

    /// Queries the search endpoint for shows matching `name`
    ///
    /// The candidates are returned in the service's own rank order.
    pub fn search(&self, name: &str) -> Result<Vec<Candidate>, TvMazeError> {
        let url = self
            .fetcher
            .request_url(&["search", "shows"], &[("q", name)])?;

        self.fetcher.fetch_json(&url, self.use_cache)
    }

    /// Searches for `name` and picks the single best matching show
    ///
    /// See [`select_show`] for the matching rules.
    ///
    /// # Errors
    ///
    /// Returns [`TvMazeError::ShowNotFound`] if no candidate is acceptable, or
    /// any error of the underlying search request.
    pub fn resolve(&self, name: &str, region: Option<&str>) -> Result<Show, TvMazeError> {
        let candidates = self.search(name)?;

        let show = select_show(candidates, name, region)
            .ok_or_else(|| TvMazeError::ShowNotFound(name.to_string()))?;

        tracing::debug!(query = name, id = show.id, name = %show.name, "resolved show");
        Ok(show)
    }
}

/// Picks the best show for `name` from ranked search candidates
///
/// Candidates are scanned in the given order and the first acceptable one
/// wins; they are never re-ranked.
///
/// 1. If `region` is set (and not empty): the first show whose network
///    country code equals `region` and whose name starts with `name`.
/// 2. The first show whose name equals `name`, ignoring case.
/// 3. The first show whose name starts with `name`.
///
/// Steps 2 and 3 ignore the region, since the service's country data does
/// not always agree with where a show actually aired.
pub fn select_show(candidates: Vec<Candidate>, name: &str, region: Option<&str>) -> Option<Show> {
    let index = best_match(&candidates, name, region)?;
    candidates.into_iter().nth(index).map(|candidate| candidate.show)
}

fn best_match(candidates: &[Candidate], name: &str, region: Option<&str>) -> Option<usize> {
    if let Some(region) = region.filter(|region| !region.is_empty()) {
        let regional = candidates.iter().position(|candidate| {
            candidate.show.country_code() == Some(region) && candidate.show.name.starts_with(name)
        });
        if regional.is_some() {
            return regional;
        }
    }

    let folded = name.to_lowercase();
    candidates
        .iter()
        .position(|candidate| candidate.show.name.to_lowercase() == folded)
        .or_else(|| {
            candidates
                .iter()
                .position(|candidate| candidate.show.name.starts_with(name))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::tvmaze::testing::{ScriptedTransport, candidate_json};
    use reqwest::{StatusCode, Url};
    use std::sync::Arc;

    fn candidates(entries: &[(u64, &str, Option<&str>)]) -> Vec<Candidate> {
        let json = entries
            .iter()
            .map(|(id, name, country)| candidate_json(*id, name, *country))
            .collect::<Vec<_>>()
            .join(",");
        serde_json::from_str(&format!("[{}]", json)).unwrap()
    }

    fn fetcher_with(transport: ScriptedTransport) -> Fetcher {
        let base = Url::parse("https://api.tvmaze.com").unwrap();
        Fetcher::new(base, Arc::new(CacheStore::default()), Box::new(transport))
    }

    #[test]
    fn test_exact_match_ignores_case() {
        let found = select_show(candidates(&[(1, "Fringe", None)]), "fringe", None);
        assert_eq!(found.map(|show| show.id), Some(1));
    }

    #[test]
    fn test_prefix_fallback_when_no_exact_match() {
        let found = select_show(candidates(&[(7, "Archer (2009)", None)]), "Archer", None);
        assert_eq!(found.map(|show| show.id), Some(7));
    }

    #[test]
    fn test_exact_match_beats_earlier_prefix_match() {
        let list = candidates(&[(1, "Archer (2009)", None), (2, "Archer", None)]);
        let found = select_show(list, "Archer", None);
        assert_eq!(found.map(|show| show.id), Some(2));
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let found = select_show(candidates(&[(7, "Archer (2009)", None)]), "archer", None);
        assert!(found.is_none());
    }

    #[test]
    fn test_region_match_wins_over_rank() {
        let list = candidates(&[(1, "Lost Girl", Some("US")), (2, "Lost Girl", Some("CA"))]);
        let found = select_show(list, "Lost Girl", Some("CA"));
        assert_eq!(found.map(|show| show.id), Some(2));
    }

    #[test]
    fn test_region_pass_runs_before_exact_match() {
        let list = candidates(&[(1, "Lost Girl", Some("CA")), (2, "Lost Girl", Some("US"))]);
        let found = select_show(list, "Lost Girl", Some("CA"));
        assert_eq!(found.map(|show| show.id), Some(1));
    }

    #[test]
    fn test_region_pass_accepts_prefix_match() {
        let list = candidates(&[(1, "Shameless", Some("GB")), (2, "Shameless (US)", Some("US"))]);
        let found = select_show(list, "Shameless", Some("US"));
        assert_eq!(found.map(|show| show.id), Some(2));
    }

    #[test]
    fn test_falls_back_when_region_does_not_match() {
        let list = candidates(&[(1, "Lost Girl", Some("CA"))]);
        let found = select_show(list, "lost girl", Some("US"));
        assert_eq!(found.map(|show| show.id), Some(1));
    }

    #[test]
    fn test_empty_region_is_ignored() {
        let list = candidates(&[(1, "Lost Girl (2010)", None), (2, "Lost Girl", Some("CA"))]);
        let found = select_show(list, "Lost Girl", Some(""));
        assert_eq!(found.map(|show| show.id), Some(2));
    }

    #[test]
    fn test_show_without_network_resolves_by_name() {
        let list = candidates(&[(1, "Fringe", None)]);
        assert_eq!(best_match(&list, "Fringe", Some("US")), Some(0));
    }

    #[test]
    fn test_no_match() {
        let found = select_show(candidates(&[(1, "Fringe", None)]), "NoSuchShow", None);
        assert!(found.is_none());
    }

    #[test]
    fn test_resolve_queries_search_endpoint() {
        let url = "https://api.tvmaze.com/search/shows?q=lost+girl";
        let body = format!(
            "[{},{}]",
            candidate_json(10, "Lost Girl", Some("CA")),
            candidate_json(11, "Lost Girl", Some("US"))
        );
        let transport = ScriptedTransport::new().ok(url, &body);
        let calls = transport.call_log();
        let fetcher = fetcher_with(transport);

        let show = SearchResolver::new(&fetcher, true)
            .resolve("lost girl", Some("US"))
            .unwrap();

        // "lost girl" is no prefix of "Lost Girl", so the region pass fails
        // and the case-insensitive exact match picks the first candidate
        assert_eq!(show.id, 10);
        assert_eq!(calls.lock().unwrap().as_slice(), [url.to_string()]);
    }

    #[test]
    fn test_resolve_not_found() {
        let url = "https://api.tvmaze.com/search/shows?q=NoSuchShow";
        let body = format!("[{}]", candidate_json(1, "Fringe", None));
        let fetcher = fetcher_with(ScriptedTransport::new().ok(url, &body));

        let result = SearchResolver::new(&fetcher, true).resolve("NoSuchShow", None);
        assert!(matches!(result, Err(TvMazeError::ShowNotFound(name)) if name == "NoSuchShow"));
    }

    #[test]
    fn test_resolve_empty_result_is_not_found() {
        let url = "https://api.tvmaze.com/search/shows?q=Fringe";
        let fetcher = fetcher_with(ScriptedTransport::new().ok(url, "[]"));

        let result = SearchResolver::new(&fetcher, true).resolve("Fringe", None);
        assert!(matches!(result, Err(TvMazeError::ShowNotFound(_))));
    }

    #[test]
    fn test_resolve_propagates_request_errors() {
        let url = "https://api.tvmaze.com/search/shows?q=Fringe";
        let fetcher =
            fetcher_with(ScriptedTransport::new().status(url, StatusCode::TOO_MANY_REQUESTS));

        let result = SearchResolver::new(&fetcher, true).resolve("Fringe", None);
        assert!(matches!(result, Err(TvMazeError::HttpStatus { status: 429, .. })));
    }

    #[test]
    fn test_search_preserves_rank_order() {
        let url = "https://api.tvmaze.com/search/shows?q=girls";
        let body = format!(
            "[{},{},{}]",
            candidate_json(3, "Girls", None),
            candidate_json(1, "Gilmore Girls", None),
            candidate_json(2, "New Girl", None)
        );
        let fetcher = fetcher_with(ScriptedTransport::new().ok(url, &body));

        let ids: Vec<u64> = SearchResolver::new(&fetcher, true)
            .search("girls")
            .unwrap()
            .into_iter()
            .map(|candidate| candidate.show.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
