//! Integration tests for Contact-Trawl
//!
//! These tests use wiremock to stand in for business websites and social
//! profiles, and exercise the real reqwest-backed fetcher end-to-end.

mod discovery_tests;
mod fetcher_tests;
mod job_tests;

use contact_trawl::config::{
    ColumnConfig, Config, CrawlerConfig, FilterConfig, ProfilesConfig, StoreBackend, StoreConfig,
    UserAgentConfig,
};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{method, path};

/// Creates a test configuration storing sheets under `store_path`
pub fn create_test_config(store_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_timeout: 5,
            max_concurrent_records: 2,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestTrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            profile_user_agent: "Mozilla/5.0".to_string(),
        },
        store: StoreConfig {
            backend: StoreBackend::Json,
            path: store_path.to_string(),
            sheet: "Sheet1".to_string(),
        },
        columns: ColumnConfig::default(),
        filter: FilterConfig::default(),
        profiles: ProfilesConfig::default(),
    }
}

/// Serves an HTML page at `route`
pub async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}
