//! Scripted transport for network-free tests

use super::{HttpResponse, Transport, TvMazeError};
use reqwest::{StatusCode, Url};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Reply {
    Status(StatusCode, Vec<u8>),
    Failure(String),
}

/// Answers requests from a table of canned replies keyed by URL.
///
/// Unknown URLs get a 404. Every requested URL is recorded in a log that
/// stays readable after the transport has been boxed into a fetcher.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replies to `url` with 200 OK and `body`
    pub(crate) fn ok(mut self, url: &str, body: &str) -> Self {
        self.replies.insert(
            url.to_string(),
            Reply::Status(StatusCode::OK, body.as_bytes().to_vec()),
        );
        self
    }

    /// Replies to `url` with the given status and an empty body
    pub(crate) fn status(mut self, url: &str, status: StatusCode) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Status(status, Vec::new()));
        self
    }

    /// Fails requests to `url` as if the connection broke
    pub(crate) fn failing(mut self, url: &str, message: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Failure(message.to_string()));
        self
    }

    /// Shared log of every requested URL, in request order
    pub(crate) fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, TvMazeError> {
        self.calls.lock().unwrap().push(url.to_string());

        match self.replies.get(url.as_str()).cloned() {
            Some(Reply::Status(status, body)) => Ok(HttpResponse { status, body }),
            Some(Reply::Failure(message)) => Err(TvMazeError::Transport(message)),
            None => Ok(HttpResponse {
                status: StatusCode::NOT_FOUND,
                body: Vec::new(),
            }),
        }
    }
}

/// Builds one search result as the service would return it
pub(crate) fn candidate_json(id: u64, name: &str, country: Option<&str>) -> String {
    let network = match country {
        Some(code) => format!(
            concat!(
                r#"{{"id": {id}, "name": "Net {code}", "#,
                r#""country": {{"name": "{code}", "code": "{code}", "timezone": "UTC"}}}}"#
            ),
            id = id,
            code = code
        ),
        None => "null".to_string(),
    };
    format!(r#"{{"score": 1.0, "show": {{"id": {id}, "name": "{name}", "network": {network}}}}}"#)
}
