//! Crawler module for contact discovery
//!
//! This module contains the core discovery logic, including:
//! - Single-attempt page fetching with a per-fetch timeout
//! - `mailto:` extraction and contact/about/social link classification
//! - Social profile scanning near contact markers
//! - The per-record fallback pipeline and the concurrent batch runner
//! - Follow-up visits to saved social profile links
//! - Job coordination against the record store

mod batch;
mod coordinator;
mod discovery;
mod fetcher;
mod follow_up;
mod parser;
mod progress;
mod record;
mod social;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchReport, BatchRunner};
pub use coordinator::{write_back, Coordinator};
pub use discovery::Discoverer;
pub use fetcher::{
    build_http_client, fetch_url, FetchFailure, FetchRequest, FetchResult, HttpFetcher,
    PageFetcher, MAX_BODY_BYTES,
};
pub use follow_up::{follow_up_profile, profile_leads, FollowUp, ProfileLead};
pub use parser::{
    classify_links, extract_mailto_emails, scan_page, LinkTriple, PageScan, ABOUT_KEYWORDS,
    CONTACT_KEYWORDS, SOCIAL_KEYWORDS,
};
pub use progress::{ChannelSink, NullSink, ProgressSink, TracingSink};
pub use record::{Discovery, EmailSet, InputRecord, OutputRecord, Tier, EMAIL_SEPARATOR};
pub use social::{
    first_pattern_email, pattern_emails, profile_emails, scan_profile, ProfileScan,
    MARKER_WINDOW_CHARS, PROFILE_MARKERS,
};

use crate::config::Config;
use crate::output::{BatchStats, FollowUpStats};
use crate::TrawlError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a complete scrape job
///
/// This is the main entry point for a run. It will:
/// 1. Open the configured record store
/// 2. Build the HTTP client
/// 3. Discover every record of the sheet, bounded by the concurrency limit
/// 4. Write emails and social links back to the sheet
/// 5. Rebuild the emails-only sheet when enabled
///
/// # Arguments
///
/// * `config` - The trawler configuration
/// * `cancel` - Stops new records from starting when cancelled
///
/// # Returns
///
/// * `Ok(BatchStats)` - Job finished, possibly cancelled part way
/// * `Err(TrawlError)` - The store or the client could not be used
pub async fn scrape(config: Config, cancel: &CancellationToken) -> Result<BatchStats, TrawlError> {
    let mut coordinator = Coordinator::from_config(config, Arc::new(TracingSink))?;
    coordinator.scrape(cancel).await
}

/// Rebuilds the emails-only sheet without scraping
pub fn filter(config: Config) -> Result<usize, TrawlError> {
    let mut coordinator = Coordinator::from_config(config, Arc::new(TracingSink))?;
    coordinator.filter_emails()
}

/// Revisits saved social profile links for rows still lacking an email
pub async fn follow_up_profiles(
    config: Config,
    cancel: &CancellationToken,
) -> Result<FollowUpStats, TrawlError> {
    let mut coordinator = Coordinator::from_config(config, Arc::new(TracingSink))?;
    coordinator.follow_up_profiles(cancel).await
}
