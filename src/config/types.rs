use serde::Deserialize;

/// Main configuration structure for Contact-Trawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Timeout for a single fetch, in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Number of records discovered concurrently
    #[serde(rename = "max-concurrent-records", default = "default_concurrency")]
    pub max_concurrent_records: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Browser-like user agent sent to social profile pages
    #[serde(rename = "profile-user-agent", default = "default_profile_user_agent")]
    pub profile_user_agent: String,
}

impl UserAgentConfig {
    /// Formats the default user agent: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Which record store backs the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// A SQLite database file
    Sqlite,
    /// A directory holding one `<sheet>.json` file per sheet
    Json,
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Database file or sheet directory
    pub path: String,

    /// Sheet holding the business records
    #[serde(default = "default_sheet")]
    pub sheet: String,
}

/// Column names used to read input and write results
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_website_column")]
    pub website: String,

    #[serde(default = "default_email_column")]
    pub email: String,

    #[serde(default = "default_social_column")]
    pub social: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            website: default_website_column(),
            email: default_email_column(),
            social: default_social_column(),
        }
    }
}

/// Emails-only sheet configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Rebuild the filter sheet after every scrape
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Name of the sheet receiving rows with an email
    #[serde(default = "default_filter_sheet")]
    pub sheet: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sheet: default_filter_sheet(),
        }
    }
}

/// Follow-up pass over saved social profile links
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesConfig {
    /// Number of profile pages fetched concurrently
    #[serde(rename = "max-concurrent", default = "default_profile_concurrency")]
    pub max_concurrent: u32,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_profile_concurrency(),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}

fn default_concurrency() -> u32 {
    4
}

fn default_profile_concurrency() -> u32 {
    7
}

fn default_profile_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_sheet() -> String {
    "Sheet1".to_string()
}

fn default_website_column() -> String {
    "Business Website".to_string()
}

fn default_email_column() -> String {
    "Business Email".to_string()
}

fn default_social_column() -> String {
    "Facebook Link".to_string()
}

fn default_filter_sheet() -> String {
    "Emails Only".to_string()
}

fn default_true() -> bool {
    true
}
