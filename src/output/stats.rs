//! Statistics for a discovery batch
//!
//! This module summarizes where emails were found and how many fetches a
//! batch needed, for discovery runs and profile follow-up runs.

use crate::crawler::{BatchReport, FollowUp, Tier};
use std::collections::HashMap;

/// Discovery batch statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of input records
    pub total_records: usize,

    /// Records whose pipeline completed
    pub completed: usize,

    /// Records never started or whose pipeline aborted
    pub incomplete: usize,

    /// Completed records per ending tier
    pub by_tier: HashMap<Tier, usize>,

    /// Records that ended with an email
    pub emails_found: usize,

    /// Records that ended with only a social link
    pub social_links_saved: usize,

    /// Fetches issued across all records
    pub fetches: u64,

    /// Fetches that failed
    pub failed_fetches: u64,
}

impl BatchStats {
    /// Computes statistics from a batch report
    pub fn from_report(report: &BatchReport) -> Self {
        let mut stats = BatchStats {
            total_records: report.discoveries.len(),
            ..Default::default()
        };

        for discovery in report.discoveries.iter().flatten() {
            stats.completed += 1;
            *stats.by_tier.entry(discovery.tier).or_insert(0) += 1;

            if discovery.output.has_email() {
                stats.emails_found += 1;
            } else if !discovery.output.social_link_saved.is_empty() {
                stats.social_links_saved += 1;
            }

            stats.fetches += u64::from(discovery.fetches);
            stats.failed_fetches += u64::from(discovery.failed_fetches);
        }

        stats.incomplete = stats.total_records - stats.completed;
        stats
    }

    /// Number of completed records that ended at `tier`
    pub fn tier_count(&self, tier: Tier) -> usize {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &BatchStats) {
    println!("=== Discovery Statistics ===\n");

    println!("Overview:");
    println!("  Records: {}", stats.total_records);
    println!("  Completed: {}", stats.completed);
    if stats.incomplete > 0 {
        println!("  Not completed: {}", stats.incomplete);
    }
    println!();

    println!("Records by Tier:");
    for tier in [
        Tier::Homepage,
        Tier::Contact,
        Tier::About,
        Tier::Social,
        Tier::Exhausted,
        Tier::Unscrapable,
    ] {
        let count = stats.tier_count(tier);
        let percentage = if stats.completed > 0 {
            (count as f64 / stats.completed as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", tier.as_str(), count, percentage);
    }
    println!();

    println!(
        "Fetches: {} ({} failed)",
        stats.fetches, stats.failed_fetches
    );
    println!(
        "Result: {} with email, {} with social link only",
        stats.emails_found, stats.social_links_saved
    );
}

/// Profile follow-up statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowUpStats {
    /// Rows with a saved profile link and no email
    pub leads: usize,

    /// Leads whose visit completed
    pub completed: usize,

    /// Leads that yielded an email
    pub emails_found: usize,

    /// Profile fetches that failed
    pub failed_fetches: usize,

    /// Set when cancellation left leads unvisited
    pub cancelled: bool,
}

impl FollowUpStats {
    /// Computes statistics from per-lead results, `None` for unvisited leads
    pub fn from_results(results: &[Option<FollowUp>], cancelled: bool) -> Self {
        let mut stats = FollowUpStats {
            leads: results.len(),
            cancelled,
            ..Default::default()
        };

        for follow_up in results.iter().flatten() {
            stats.completed += 1;
            if follow_up.email.is_some() {
                stats.emails_found += 1;
            }
            if follow_up.fetch_failed {
                stats.failed_fetches += 1;
            }
        }

        stats
    }
}

/// Prints follow-up statistics to stdout
pub fn print_follow_up_statistics(stats: &FollowUpStats) {
    println!("=== Profile Follow-up Statistics ===\n");

    println!("  Saved profile links: {}", stats.leads);
    println!("  Visited: {}", stats.completed);
    if stats.cancelled {
        println!("  Not visited (cancelled): {}", stats.leads - stats.completed);
    }
    println!("  Failed fetches: {}", stats.failed_fetches);
    println!("  Emails found: {}", stats.emails_found);
}
