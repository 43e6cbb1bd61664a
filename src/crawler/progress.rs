//! Progress reporting for discovery runs
//!
//! Progress lines ("Scraping: ...", "Found profile email: ...") are a side
//! channel for whoever launched the job. Sinks are injected into the
//! pipeline, and a sink that can no longer deliver simply drops lines.

use tokio::sync::mpsc::UnboundedSender;

/// Destination for human-readable progress lines
pub trait ProgressSink: Send + Sync {
    /// Delivers one line; must not fail or block
    fn emit(&self, line: &str);
}

/// Writes progress lines to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, line: &str) {
        tracing::info!(target: "contact_trawl::progress", "{}", line);
    }
}

/// Discards progress lines
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _line: &str) {}
}

/// Forwards progress lines to a channel, e.g. a websocket log stream
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, line: &str) {
        // A closed receiver only means nobody is listening any more
        let _ = self.sender.send(line.to_string());
    }
}
