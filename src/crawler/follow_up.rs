//! Profile follow-up for records discovery left without an email
//!
//! Discovery saves the first social link of a record when every tier came up
//! empty. This pass revisits those saved links with the profile user agent
//! and takes the first email-shaped string anywhere in the page.

use crate::crawler::fetcher::{FetchRequest, PageFetcher};
use crate::crawler::progress::ProgressSink;
use crate::crawler::social::first_pattern_email;
use crate::storage::Sheet;

/// A saved profile link waiting for a follow-up visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLead {
    /// Data row of the sheet the result goes back to
    pub row: usize,
    pub url: String,
}

/// Result of visiting one saved profile link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub lead: ProfileLead,

    /// First email on the page; `None` when absent or the fetch failed
    pub email: Option<String>,

    pub fetch_failed: bool,
}

/// Rows with a saved social link and a blank email cell
pub fn profile_leads(sheet: &Sheet, social_column: usize, email_column: usize) -> Vec<ProfileLead> {
    (0..sheet.row_count())
        .filter(|&row| sheet.cell(row, email_column).trim().is_empty())
        .filter_map(|row| {
            let url = sheet.cell(row, social_column).trim();
            (!url.is_empty()).then(|| ProfileLead {
                row,
                url: url.to_string(),
            })
        })
        .collect()
}

/// Visits one saved profile link
///
/// Never fails: a failed fetch yields no email.
pub async fn follow_up_profile<F: PageFetcher>(
    fetcher: &F,
    lead: ProfileLead,
    user_agent: &str,
    progress: &dyn ProgressSink,
) -> FollowUp {
    // Sheet rows are 1-based and the header takes row 1
    progress.emit(&format!("Row {}: {}", lead.row + 2, lead.url));

    let fetch = fetcher
        .fetch(FetchRequest::page(lead.url.as_str()).with_user_agent(user_agent))
        .await;

    let email = match &fetch.failure {
        Some(failure) => {
            tracing::debug!("Profile fetch failed for {}: {}", lead.url, failure);
            None
        }
        None => first_pattern_email(&fetch.body),
    };

    match &email {
        Some(email) => progress.emit(&format!("Found email: {}", email)),
        None => progress.emit("No email found"),
    }

    FollowUp {
        lead,
        email,
        fetch_failed: !fetch.is_ok(),
    }
}
