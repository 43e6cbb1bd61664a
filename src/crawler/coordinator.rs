//! Job coordinator - ties the record store to the discovery batch
//!
//! This module runs the jobs the CLI exposes:
//! - Scrape: read the record sheet, discover every record, write results back
//! - Profiles: revisit saved social links of rows without an email
//! - Filter: rebuild the emails-only sheet from the record sheet

use crate::config::{ColumnConfig, Config};
use crate::crawler::batch::{run_bounded, BatchReport, BatchRunner};
use crate::crawler::discovery::Discoverer;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::follow_up::{follow_up_profile, profile_leads};
use crate::crawler::progress::ProgressSink;
use crate::output::{BatchStats, FollowUpStats};
use crate::storage::{open_store, RecordStore, Sheet, StorageError};
use crate::TrawlError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Main job coordinator structure
pub struct Coordinator<F> {
    config: Arc<Config>,
    store: Box<dyn RecordStore>,
    runner: BatchRunner<F>,
    progress: Arc<dyn ProgressSink>,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator with the configured store and an HTTP fetcher
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Store opened and client built
    /// * `Err(TrawlError)` - The store or the HTTP client could not be set up
    pub fn from_config(
        config: Config,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Self, TrawlError> {
        let store = open_store(&config.store)?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(config, store, fetcher, progress))
    }
}

impl<F: PageFetcher + 'static> Coordinator<F> {
    /// Creates a coordinator from its parts
    pub fn new(
        config: Config,
        store: Box<dyn RecordStore>,
        fetcher: F,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        let discoverer = Discoverer::new(
            fetcher,
            config.user_agent.profile_user_agent.clone(),
            Arc::clone(&progress),
        );
        let runner = BatchRunner::new(
            Arc::new(discoverer),
            config.crawler.max_concurrent_records as usize,
        );

        Self {
            config: Arc::new(config),
            store,
            runner,
            progress,
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Runs the scrape job
    ///
    /// Reading the sheet or writing it back are the only failures that end
    /// the job; individual records always produce some output.
    pub async fn scrape(&mut self, cancel: &CancellationToken) -> Result<BatchStats, TrawlError> {
        let sheet_name = self.config.store.sheet.clone();
        let mut sheet = self.store.read_sheet(&sheet_name)?;
        let records = sheet.records(&sheet_name, &self.config.columns.website)?;

        tracing::info!(
            "Loaded {} records from sheet '{}'",
            records.len(),
            sheet_name
        );

        let report = self.runner.run(records, cancel).await;

        write_back(&mut sheet, &report, &self.config.columns);
        self.store.write_sheet(&sheet_name, &sheet)?;

        let stats = BatchStats::from_report(&report);
        tracing::info!(
            "Wrote {} results to '{}' ({} with email, {} not completed)",
            stats.completed,
            sheet_name,
            stats.emails_found,
            stats.incomplete
        );
        self.progress.emit("DONE! Website scraper completed.");

        if self.config.filter.enabled {
            self.filter_emails()?;
        }

        Ok(stats)
    }

    /// Runs the profile follow-up job
    ///
    /// Every row with a saved social link and a blank email cell gets its
    /// link fetched once with the profile user agent. Found emails are written
    /// to the row's email cell; rows without a result are left untouched.
    pub async fn follow_up_profiles(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<FollowUpStats, TrawlError> {
        let sheet_name = self.config.store.sheet.clone();
        let mut sheet = self.store.read_sheet(&sheet_name)?;
        let social_column = sheet
            .column(&self.config.columns.social)
            .ok_or_else(|| StorageError::MissingColumn {
                sheet: sheet_name.clone(),
                column: self.config.columns.social.clone(),
            })?;
        let email_column = sheet.ensure_column(&self.config.columns.email);

        let leads = profile_leads(&sheet, social_column, email_column);
        let max_concurrent = self.config.profiles.max_concurrent as usize;
        tracing::info!(
            "Following up {} saved profile links ({} at a time)",
            leads.len(),
            max_concurrent
        );

        let discoverer = Arc::clone(self.runner.discoverer());
        let user_agent = self.config.user_agent.profile_user_agent.clone();
        let progress = Arc::clone(&self.progress);
        let (results, cancelled) = run_bounded(leads, max_concurrent, cancel, move |lead| {
            let discoverer = Arc::clone(&discoverer);
            let user_agent = user_agent.clone();
            let progress = Arc::clone(&progress);
            async move {
                follow_up_profile(discoverer.fetcher(), lead, &user_agent, progress.as_ref()).await
            }
        })
        .await;

        for follow_up in results.iter().flatten() {
            if let Some(email) = &follow_up.email {
                sheet.set_cell(follow_up.lead.row, email_column, email.as_str());
            }
        }
        self.store.write_sheet(&sheet_name, &sheet)?;

        let stats = FollowUpStats::from_results(&results, cancelled);
        tracing::info!(
            "Profile follow-up wrote {} emails to '{}'",
            stats.emails_found,
            sheet_name
        );
        self.progress.emit("Profile follow-up complete.");

        if self.config.filter.enabled {
            self.filter_emails()?;
        }

        Ok(stats)
    }

    /// Rebuilds the emails-only sheet
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of rows copied
    /// * `Err(TrawlError)` - The record sheet could not be read or the
    ///   filter sheet written
    pub fn filter_emails(&mut self) -> Result<usize, TrawlError> {
        let sheet_name = &self.config.store.sheet;
        let filter_name = &self.config.filter.sheet;

        let sheet = self.store.read_sheet(sheet_name)?;
        let email_column = sheet
            .column(&self.config.columns.email)
            .ok_or_else(|| StorageError::MissingColumn {
                sheet: sheet_name.clone(),
                column: self.config.columns.email.clone(),
            })?;

        let filtered = sheet.rows_with_value(email_column);

        self.store.delete_sheet(filter_name)?;
        self.store.write_sheet(filter_name, &filtered)?;

        tracing::info!(
            "Copied {} of {} rows to '{}'",
            filtered.row_count(),
            sheet.row_count(),
            filter_name
        );
        self.progress.emit(&format!(
            "Email filter complete: '{}' created.",
            filter_name
        ));

        Ok(filtered.row_count())
    }
}

/// Writes batch outputs into the sheet's email and social columns
///
/// Columns are added when missing. Rows whose pipeline did not complete keep
/// their previous values.
pub fn write_back(sheet: &mut Sheet, report: &BatchReport, columns: &ColumnConfig) {
    let email_column = sheet.ensure_column(&columns.email);
    let social_column = sheet.ensure_column(&columns.social);

    for (row, output) in report.outputs().enumerate() {
        let Some(output) = output else {
            continue;
        };
        sheet.set_cell(row, email_column, output.email_joined.as_str());
        sheet.set_cell(row, social_column, output.social_link_saved.as_str());
    }
}
