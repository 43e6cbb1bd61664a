//! In-memory page source for pipeline tests

use crate::crawler::fetcher::{FetchFailure, FetchRequest, FetchResult, PageFetcher};
use crate::crawler::progress::ProgressSink;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

/// Serves canned responses and records every request
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, FetchResult>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200 for `url`
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), FetchResult::success(body, 200));
        self
    }

    /// Serves an arbitrary result for `url`
    pub fn result(mut self, url: &str, result: FetchResult) -> Self {
        self.responses.insert(url.to_string(), result);
        self
    }

    /// Delays the response for `url`
    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl PageFetcher for ScriptedFetcher {
    fn fetch(&self, request: FetchRequest) -> impl Future<Output = FetchResult> + Send {
        self.requests.lock().unwrap().push(request.clone());

        let result = self
            .responses
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| FetchResult::failed(FetchFailure::Connect));
        let delay = self.delays.get(&request.url).copied();

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}

/// Keeps every progress line in memory
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ProgressSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
