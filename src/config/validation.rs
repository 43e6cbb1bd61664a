use crate::config::types::{
    ColumnConfig, Config, CrawlerConfig, FilterConfig, ProfilesConfig, StoreConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

const MAX_CONCURRENT_RECORDS: u32 = 64;
const MAX_CONCURRENT_PROFILES: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_store_config(&config.store)?;
    validate_columns(&config.columns)?;
    validate_filter(&config.filter, &config.store)?;
    validate_profiles(&config.profiles)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.max_concurrent_records < 1 || config.max_concurrent_records > MAX_CONCURRENT_RECORDS
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-records must be between 1 and {}, got {}",
            MAX_CONCURRENT_RECORDS, config.max_concurrent_records
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    if config.profile_user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "profile-user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates record store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store path cannot be empty".to_string(),
        ));
    }

    validate_sheet_name(&config.sheet)
}

/// Validates column names: non-empty and pairwise distinct
fn validate_columns(columns: &ColumnConfig) -> Result<(), ConfigError> {
    let names = [&columns.website, &columns.email, &columns.social];

    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "column names cannot be empty".to_string(),
        ));
    }

    if columns.website == columns.email
        || columns.website == columns.social
        || columns.email == columns.social
    {
        return Err(ConfigError::Validation(format!(
            "column names must be distinct, got website='{}', email='{}', social='{}'",
            columns.website, columns.email, columns.social
        )));
    }

    Ok(())
}

/// Validates the emails-only sheet settings
fn validate_filter(filter: &FilterConfig, store: &StoreConfig) -> Result<(), ConfigError> {
    validate_sheet_name(&filter.sheet)?;

    if filter.sheet == store.sheet {
        return Err(ConfigError::Validation(format!(
            "filter sheet must differ from the record sheet '{}'",
            store.sheet
        )));
    }

    Ok(())
}

/// Validates the profile follow-up settings
fn validate_profiles(config: &ProfilesConfig) -> Result<(), ConfigError> {
    if config.max_concurrent < 1 || config.max_concurrent > MAX_CONCURRENT_PROFILES {
        return Err(ConfigError::Validation(format!(
            "profiles max-concurrent must be between 1 and {}, got {}",
            MAX_CONCURRENT_PROFILES, config.max_concurrent
        )));
    }

    Ok(())
}

/// Sheet names double as file names for the JSON store
fn validate_sheet_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sheet name cannot be empty".to_string(),
        ));
    }

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "sheet name '{}' cannot contain path separators",
            name
        )));
    }

    Ok(())
}
