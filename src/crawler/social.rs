//! Social profile email extraction
//!
//! Social platforms rarely expose `mailto:` links, so profile pages are
//! searched as raw text instead: every known marker found in the lower-cased
//! body opens a bounded window that is scanned with a permissive email
//! pattern. The pattern is never applied to ordinary website pages.

use crate::crawler::fetcher::{FetchRequest, FetchResult, PageFetcher};
use crate::crawler::record::EmailSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Markers around which profile pages tend to carry contact details
pub const PROFILE_MARKERS: &[&str] = &[
    "page_about_info",
    "page_info",
    "email",
    "contact info",
    "\"description\":",
];

/// Number of characters scanned from the start of each marker
pub const MARKER_WINDOW_CHARS: usize = 3000;

const EMAIL_PATTERN: &str = r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("static email pattern"));

/// Finds every email-shaped substring of `text`
///
/// Intentionally permissive: decorative or obfuscated text can produce false
/// positives.
///
/// # Example
///
/// ```
/// use contact_trawl::crawler::pattern_emails;
///
/// let emails = pattern_emails("reach us: Hello@Shop.example.org or hello@shop.example.org");
/// assert_eq!(emails.joined(), "hello@shop.example.org");
/// ```
pub fn pattern_emails(text: &str) -> EmailSet {
    EMAIL_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// First email-shaped string anywhere in `text`, lower-cased
///
/// Used for saved profile links, where the whole page is searched rather
/// than the marker windows.
pub fn first_pattern_email(text: &str) -> Option<String> {
    pattern_emails(text).iter().next().map(str::to_string)
}

/// Scans a profile page body around each marker
///
/// Only the first occurrence of each marker is considered. Matches from all
/// markers are accumulated.
pub fn profile_emails(body: &str) -> EmailSet {
    let lowered = body.to_lowercase();
    let mut emails = EmailSet::new();

    for marker in PROFILE_MARKERS {
        if let Some(start) = lowered.find(marker) {
            let window = char_window(&lowered, start, MARKER_WINDOW_CHARS);
            let found = pattern_emails(window);
            if !found.is_empty() {
                tracing::debug!("Marker {:?} yielded {} email(s)", marker, found.len());
                emails.extend(found);
            }
        }
    }

    emails
}

/// Returns up to `chars` characters of `text` starting at byte `start`
fn char_window(text: &str, start: usize, chars: usize) -> &str {
    let tail = &text[start..];
    let end = tail
        .char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(tail.len());
    &tail[..end]
}

/// Outcome of scanning one social profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileScan {
    /// The profile fetch itself
    pub fetch: FetchResult,

    /// Emails found near markers; empty when the fetch failed
    pub emails: EmailSet,
}

/// Fetches a social profile with a browser-like user agent and scans it
pub async fn scan_profile<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    user_agent: &str,
) -> ProfileScan {
    let fetch = fetcher
        .fetch(FetchRequest::page(url).with_user_agent(user_agent))
        .await;

    let emails = if fetch.is_ok() {
        profile_emails(&fetch.body)
    } else {
        EmailSet::new()
    };

    ProfileScan { fetch, emails }
}
