//! HTML parser for contact discovery
//!
//! This module extracts two things from a parsed page:
//! - Emails referenced by `mailto:` anchors
//! - The first contact-like link, the first about-like link, and every
//!   social profile link, resolved against the page's base URL
//!
//! Ordinary page text is never scanned for email-shaped strings here; only
//! explicit `mailto:` links count.

use crate::crawler::record::EmailSet;
use crate::url::resolve_link;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// Substrings marking a contact page link
pub const CONTACT_KEYWORDS: &[&str] = &["contact", "contact-us"];

/// Substrings marking an about page link
pub const ABOUT_KEYWORDS: &[&str] = &["about", "about-us"];

/// Substrings marking a social profile link
pub const SOCIAL_KEYWORDS: &[&str] = &["facebook.com", "fb.com"];

const MAILTO_PREFIX: &str = "mailto:";

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static anchor selector"));

/// Links classified from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTriple {
    /// First contact-like link in document order
    pub contact: Option<String>,

    /// First about-like link in document order
    pub about: Option<String>,

    /// Every social profile link, in document order
    pub social: Vec<String>,
}

/// Collects the emails of every `mailto:` anchor
///
/// The scheme and any `?query` are stripped and the address lower-cased.
///
/// # Example
///
/// ```
/// use contact_trawl::crawler::extract_mailto_emails;
/// use scraper::Html;
///
/// let html = Html::parse_document(r#"<a href="mailto:Sales@Example.com?subject=hi">Mail</a>"#);
/// let emails = extract_mailto_emails(&html);
/// assert_eq!(emails.joined(), "sales@example.com");
/// ```
pub fn extract_mailto_emails(document: &Html) -> EmailSet {
    let mut emails = EmailSet::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(email) = mailto_address(href) {
            emails.insert(&email);
        }
    }

    emails
}

/// Returns the address part of a `mailto:` href
fn mailto_address(href: &str) -> Option<String> {
    let href = href.trim().to_lowercase();
    let address = href.strip_prefix(MAILTO_PREFIX)?;
    let address = address.split('?').next().unwrap_or_default().trim();

    if address.is_empty() {
        None
    } else {
        Some(address.to_string())
    }
}

/// Classifies the anchors of a page
///
/// # Classification Rules
///
/// - Matching is a substring test on the lower-cased `href`
/// - Contact and about: first match wins; the search for them stops once
///   both are found
/// - Social: every match, document order, duplicates removed
/// - Only links resolving to `http`/`https` are kept
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `base_url` - The URL relative links are resolved against
pub fn classify_links(document: &Html, base_url: &Url) -> LinkTriple {
    let mut links = LinkTriple::default();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let lowered = href.to_lowercase();

        let needs_contact_or_about = links.contact.is_none() || links.about.is_none();

        if needs_contact_or_about {
            if links.contact.is_none() && contains_any(&lowered, CONTACT_KEYWORDS) {
                links.contact = resolve_web_link(base_url, href);
            }

            if links.about.is_none() && contains_any(&lowered, ABOUT_KEYWORDS) {
                links.about = resolve_web_link(base_url, href);
            }
        }

        if contains_any(&lowered, SOCIAL_KEYWORDS) {
            if let Some(social) = resolve_web_link(base_url, href) {
                if !links.social.contains(&social) {
                    links.social.push(social);
                }
            }
        }
    }

    links
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Resolves a link, dropping `mailto:`, `tel:`, `javascript:` and the like
fn resolve_web_link(base_url: &Url, href: &str) -> Option<String> {
    let resolved = resolve_link(base_url, href)?;
    if resolved.starts_with("http://") || resolved.starts_with("https://") {
        Some(resolved)
    } else {
        None
    }
}

/// Everything the discovery pipeline needs from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageScan {
    pub emails: EmailSet,
    pub links: LinkTriple,
}

/// Parses a page body and runs the requested extractors
///
/// The parsed document is dropped before returning so that callers can hold
/// the scan across await points.
pub fn scan_page(body: &str, base_url: &Url, want_emails: bool, want_links: bool) -> PageScan {
    if !want_emails && !want_links {
        return PageScan::default();
    }

    let document = Html::parse_document(body);

    PageScan {
        emails: if want_emails {
            extract_mailto_emails(&document)
        } else {
            EmailSet::new()
        },
        links: if want_links {
            classify_links(&document, base_url)
        } else {
            LinkTriple::default()
        },
    }
}
