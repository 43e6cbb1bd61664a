//! URL handling module for Contact-Trawl
//!
//! This module turns the raw website strings found in business records into
//! fetchable origins, and resolves links found on fetched pages.

mod normalize;

pub use normalize::normalize_website;

use std::fmt;
use url::Url;

/// A website reduced to its origin: scheme, host and optional port
///
/// Paths, queries and fragments of the raw value are discarded. A
/// `NormalizedUrl` always has a non-empty scheme and host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    origin: Url,
}

impl NormalizedUrl {
    pub(crate) fn from_parsed(url: &Url) -> Option<Self> {
        url.host_str().filter(|h| !h.is_empty())?;

        let mut origin = url.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        origin.set_username("").ok()?;
        origin.set_password(None).ok()?;

        Some(Self { origin })
    }

    /// The URL scheme (`http` or `https`)
    pub fn scheme(&self) -> &str {
        self.origin.scheme()
    }

    /// The lowercase host
    pub fn host(&self) -> &str {
        self.origin.host_str().unwrap_or_default()
    }

    /// Explicit non-default port, if any
    pub fn port(&self) -> Option<u16> {
        self.origin.port()
    }

    /// The origin as a `Url`, usable as a base for link resolution
    pub fn as_url(&self) -> &Url {
        &self.origin
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port() {
            Some(port) => write!(f, "{}://{}:{}", self.scheme(), self.host(), port),
            None => write!(f, "{}://{}", self.scheme(), self.host()),
        }
    }
}

/// Resolves an `href` against a base URL
///
/// Returns `None` when the href is blank or cannot be joined onto the base.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use contact_trawl::url::resolve_link;
///
/// let base = Url::parse("http://example.com").unwrap();
/// assert_eq!(
///     resolve_link(&base, "/contact").as_deref(),
///     Some("http://example.com/contact")
/// );
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}
