use crate::url::NormalizedUrl;
use crate::UrlError;
use url::Url;

/// Escaped `=` left behind by some spreadsheet export tools
const ESCAPED_EQUALS: &str = "\\u003d";

/// Scheme injected when the raw value carries none
const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Normalizes a raw website value into a fetchable origin
///
/// # Normalization Steps
///
/// 1. Trim; reject if empty
/// 2. Replace the literal `\u003d` export artifact with `=`
/// 3. Prepend `http://` when the value has no `http`/`https` scheme
/// 4. Parse; reject if malformed or hostless
/// 5. Keep only `scheme://host[:port]`
///
/// # Arguments
///
/// * `raw` - The raw website value as found in the record
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - The origin to crawl
/// * `Err(UrlError::Empty)` - Nothing to crawl
/// * `Err(UrlError)` - The value cannot be turned into an HTTP origin
///
/// # Examples
///
/// ```
/// use contact_trawl::url::normalize_website;
///
/// let url = normalize_website("example.com/shop?x=1").unwrap();
/// assert_eq!(url.to_string(), "http://example.com");
/// ```
pub fn normalize_website(raw: &str) -> Result<NormalizedUrl, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let unescaped = trimmed.replace(ESCAPED_EQUALS, "=");
    let candidate = with_scheme(&unescaped)?;

    let url = Url::parse(&candidate).map_err(|e| UrlError::Malformed(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    NormalizedUrl::from_parsed(&url).ok_or(UrlError::MissingHost)
}

/// Ensures the value starts with an HTTP-family scheme
///
/// Values carrying some other explicit `scheme://` are rejected rather than
/// prefixed. A `://` further along, as in `example.com/?next=https://x.com`,
/// belongs to the path or query and does not count as a scheme.
fn with_scheme(value: &str) -> Result<String, UrlError> {
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(value.to_string());
    }

    if let Some((prefix, _)) = value.split_once("://") {
        if is_scheme_token(prefix) {
            return Err(UrlError::InvalidScheme(prefix.to_string()));
        }
    }

    Ok(format!("{}{}", DEFAULT_SCHEME_PREFIX, value))
}

/// A letter followed by letters, digits, `+` or `-`
///
/// `.` is legal in schemes but excluded here so a bare host such as
/// `example.com://` is never mistaken for one.
fn is_scheme_token(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-')
}
