//! Batch runner for discovering many records
//!
//! This module handles:
//! - Running record pipelines concurrently, bounded by a semaphore
//! - Re-assembling results in input order regardless of completion order
//! - Batch cancellation: no new pipelines start, in-flight ones finish

use crate::crawler::discovery::Discoverer;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::record::{Discovery, InputRecord, OutputRecord};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Results of one batch, indexed like the input
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One slot per input record; `None` if its pipeline never completed
    pub discoveries: Vec<Option<Discovery>>,

    /// Set when the batch was cancelled before every record started
    pub cancelled: bool,
}

impl BatchReport {
    /// Output per record, `None` for records that did not complete
    pub fn outputs(&self) -> impl Iterator<Item = Option<&OutputRecord>> {
        self.discoveries
            .iter()
            .map(|slot| slot.as_ref().map(|discovery| &discovery.output))
    }

    /// Number of records whose pipeline completed
    pub fn completed(&self) -> usize {
        self.discoveries.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Runs the discovery pipeline over a batch of records
pub struct BatchRunner<F> {
    discoverer: Arc<Discoverer<F>>,
    max_concurrent: usize,
}

impl<F: PageFetcher + 'static> BatchRunner<F> {
    /// Creates a runner
    ///
    /// # Arguments
    ///
    /// * `discoverer` - Shared per-record pipeline
    /// * `max_concurrent` - Number of records processed at once (min 1)
    pub fn new(discoverer: Arc<Discoverer<F>>, max_concurrent: usize) -> Self {
        Self {
            discoverer,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn discoverer(&self) -> &Arc<Discoverer<F>> {
        &self.discoverer
    }

    /// Discovers every record, preserving input order in the report
    ///
    /// Cancelling `cancel` stops launching pipelines; records already started
    /// run to completion (or to their fetch timeouts).
    pub async fn run(&self, records: Vec<InputRecord>, cancel: &CancellationToken) -> BatchReport {
        tracing::info!(
            "Discovering {} records ({} at a time)",
            records.len(),
            self.max_concurrent
        );

        let discoverer = Arc::clone(&self.discoverer);
        let (discoveries, cancelled) =
            run_bounded(records, self.max_concurrent, cancel, move |record| {
                let discoverer = Arc::clone(&discoverer);
                async move { discoverer.discover(&record).await }
            })
            .await;

        BatchReport {
            discoveries,
            cancelled,
        }
    }
}

/// Runs `work` over `items` with at most `max_concurrent` tasks in flight
///
/// Results are indexed like `items`. A slot stays `None` when its task never
/// started (cancellation) or panicked. The returned flag is set when
/// cancellation left some items unstarted.
pub(crate) async fn run_bounded<T, R, W, Fut>(
    items: Vec<T>,
    max_concurrent: usize,
    cancel: &CancellationToken,
    work: W,
) -> (Vec<Option<R>>, bool)
where
    T: Send + 'static,
    R: Send + 'static,
    W: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut handles: Vec<(usize, JoinHandle<R>)> = Vec::with_capacity(total);
    let mut cancelled = false;

    for (index, item) in items.into_iter().enumerate() {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = semaphore.clone().acquire_owned() => permit.ok(),
        };

        let Some(permit) = permit else {
            tracing::warn!(
                "Batch cancelled, {} of {} records not started",
                total - index,
                total
            );
            cancelled = true;
            break;
        };

        let task = work(item);
        handles.push((
            index,
            tokio::spawn(async move {
                let _permit = permit;
                task.await
            }),
        ));
    }

    let mut results: Vec<Option<R>> = (0..total).map(|_| None).collect();
    for (index, handle) in handles {
        match handle.await {
            Ok(result) => results[index] = Some(result),
            Err(e) => tracing::error!("Record {} task aborted: {}", index, e),
        }
    }

    (results, cancelled)
}
