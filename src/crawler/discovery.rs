//! Discovery orchestrator - per-record contact discovery
//!
//! Each record goes through a strictly sequential fallback, stopping at the
//! first tier that yields an email:
//!
//! 1. Normalize the website; unusable values end here with empty output
//! 2. Homepage: `mailto:` links
//! 3. Contact page, then about page: `mailto:` links
//! 4. Social profiles in document order: email pattern near known markers
//! 5. Nothing found: report the first social link for manual follow-up
//!
//! Fetch failures never abort a record. They make the current tier yield
//! nothing and control moves on to the next one. No page is fetched twice
//! and nothing is retried.

use crate::crawler::fetcher::{FetchRequest, FetchResult, PageFetcher};
use crate::crawler::parser::scan_page;
use crate::crawler::progress::ProgressSink;
use crate::crawler::record::{Discovery, EmailSet, InputRecord, OutputRecord, Tier};
use crate::crawler::social::scan_profile;
use crate::url::normalize_website;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Runs the discovery pipeline for single records
pub struct Discoverer<F> {
    fetcher: F,
    profile_user_agent: String,
    progress: Arc<dyn ProgressSink>,
}

impl<F: PageFetcher> Discoverer<F> {
    /// Creates a discoverer
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page source for every fetch of the pipeline
    /// * `profile_user_agent` - User agent sent to social profile pages
    /// * `progress` - Receives human-readable progress lines
    pub fn new(
        fetcher: F,
        profile_user_agent: impl Into<String>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            fetcher,
            profile_user_agent: profile_user_agent.into(),
            progress,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Discovers contact details for one record
    ///
    /// Never fails: every problem degrades to empty output.
    pub async fn discover(&self, record: &InputRecord) -> Discovery {
        let origin = match normalize_website(&record.website_raw) {
            Ok(origin) => origin,
            Err(e) => {
                if !e.is_empty() {
                    tracing::debug!("Skipping website {:?}: {}", record.website_raw, e);
                }
                return Discovery::unscrapable();
            }
        };

        self.progress.emit(&format!("Scraping: {}", origin));

        let base = origin.as_url();
        let mut run = RecordRun::new(self);

        // Homepage
        let home = run.fetch(FetchRequest::page(base.as_str())).await;
        let home_scan = scan_page(&home.body, base, home.is_ok(), home.has_body());

        if !home_scan.emails.is_empty() {
            self.progress
                .emit(&format!("Homepage emails: [{}]", home_scan.emails.joined()));
            return run.finish(Tier::Homepage, OutputRecord::with_emails(&home_scan.emails));
        }

        if let Some(failure) = &home.failure {
            if home.has_body() {
                tracing::warn!(
                    "Homepage fetch failed for {} ({}), using partial page",
                    origin,
                    failure
                );
            } else {
                tracing::warn!(
                    "Homepage fetch failed for {} ({}), no links to follow",
                    origin,
                    failure
                );
            }
        }

        let links = home_scan.links;

        // Contact before about
        for (tier, link) in [(Tier::Contact, &links.contact), (Tier::About, &links.about)] {
            let Some(url) = link else {
                continue;
            };
            if let Some(emails) = run.scan_linked_page(url, tier).await {
                return run.finish(tier, OutputRecord::with_emails(&emails));
            }
        }

        // Social profiles, document order
        for profile in &links.social {
            if !run.claim(profile) {
                continue;
            }

            self.progress.emit(&format!("Checking profile: {}", profile));
            let scan = scan_profile(&self.fetcher, profile, &self.profile_user_agent).await;
            run.record(&scan.fetch);

            if let Some(failure) = &scan.fetch.failure {
                tracing::debug!("Profile fetch failed for {}: {}", profile, failure);
                continue;
            }

            if !scan.emails.is_empty() {
                self.progress
                    .emit(&format!("Found profile email: [{}]", scan.emails.joined()));
                return run.finish(Tier::Social, OutputRecord::with_emails(&scan.emails));
            }
        }

        tracing::debug!("No email found for {}", origin);
        run.finish(
            Tier::Exhausted,
            OutputRecord::exhausted(links.social.first().map(String::as_str)),
        )
    }
}

/// Per-record bookkeeping: fetch counts and pages already requested
struct RecordRun<'a, F> {
    discoverer: &'a Discoverer<F>,
    requested: HashSet<String>,
    fetches: u32,
    failed_fetches: u32,
}

impl<'a, F: PageFetcher> RecordRun<'a, F> {
    fn new(discoverer: &'a Discoverer<F>) -> Self {
        Self {
            discoverer,
            requested: HashSet::new(),
            fetches: 0,
            failed_fetches: 0,
        }
    }

    /// Marks a URL as requested; false if it already was
    fn claim(&mut self, url: &str) -> bool {
        self.requested.insert(canonical_key(url))
    }

    fn record(&mut self, result: &FetchResult) {
        self.fetches += 1;
        if !result.is_ok() {
            self.failed_fetches += 1;
        }
    }

    async fn fetch(&mut self, request: FetchRequest) -> FetchResult {
        self.claim(&request.url);
        let result = self.discoverer.fetcher.fetch(request).await;
        self.record(&result);
        result
    }

    /// Fetches a contact or about page and collects its `mailto:` emails
    ///
    /// Returns `None` when the page was already fetched, failed to fetch, or
    /// held no `mailto:` links.
    async fn scan_linked_page(&mut self, url: &str, tier: Tier) -> Option<EmailSet> {
        if !self.claim(url) {
            tracing::debug!("{} page {} already fetched", tier.as_str(), url);
            return None;
        }

        let page = self.fetch(FetchRequest::page(url)).await;
        if let Some(failure) = &page.failure {
            tracing::debug!("{} page fetch failed for {}: {}", tier.as_str(), url, failure);
            return None;
        }

        let base = Url::parse(url).ok()?;
        let emails = scan_page(&page.body, &base, true, false).emails;
        if emails.is_empty() {
            tracing::debug!("{} page {} has no mailto links", tier.as_str(), url);
            return None;
        }

        self.discoverer
            .progress
            .emit(&format!("Email found on page {}: [{}]", url, emails.joined()));
        Some(emails)
    }

    fn finish(self, tier: Tier, output: OutputRecord) -> Discovery {
        Discovery {
            output,
            tier,
            fetches: self.fetches,
            failed_fetches: self.failed_fetches,
        }
    }
}

/// Key under which a URL counts as "already fetched"
fn canonical_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
