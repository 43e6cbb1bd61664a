use crate::{create_test_config, mount_html};
use contact_trawl::crawler::{
    build_http_client, FetchFailure, FetchRequest, HttpFetcher, PageFetcher, MAX_BODY_BYTES,
};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&create_test_config("./unused")).unwrap()
}

#[tokio::test]
async fn test_fetch_html_page() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<html><body>Hello</body></html>").await;

    let result = fetcher()
        .fetch(FetchRequest::page(format!("{}/", server.uri())))
        .await;

    assert!(result.is_ok());
    assert_eq!(result.status, Some(200));
    assert!(result.body.contains("Hello"));
}

#[tokio::test]
async fn test_error_status_still_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(r#"<a href="mailto:a@b.com">Mail</a>"#, "text/html"),
        )
        .mount(&server)
        .await;

    let result = fetcher()
        .fetch(FetchRequest::page(format!("{}/", server.uri())))
        .await;

    assert!(result.is_ok());
    assert_eq!(result.status, Some(404));
    assert!(result.body.contains("mailto:a@b.com"));
}

#[tokio::test]
async fn test_body_decoded_with_declared_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<p>Caf\xe9</p><a href=\"mailto:caf\xe9@example.com\">".to_vec(),
            "text/html; charset=windows-1252",
        ))
        .mount(&server)
        .await;

    let result = fetcher()
        .fetch(FetchRequest::page(format!("{}/", server.uri())))
        .await;

    assert!(result.is_ok());
    assert!(result.body.contains("Caf\u{e9}"));
    assert!(result.body.contains("mailto:caf\u{e9}@example.com"));
}

#[tokio::test]
async fn test_oversized_body_is_truncated() {
    let server = MockServer::start().await;
    let body = "a".repeat(MAX_BODY_BYTES + 1024);
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&server)
        .await;

    let result = fetcher()
        .fetch(FetchRequest::page(format!("{}/", server.uri())))
        .await;

    assert!(result.is_ok());
    assert_eq!(result.body.len(), MAX_BODY_BYTES);
}

#[tokio::test]
async fn test_binary_content_is_a_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"),
        )
        .mount(&server)
        .await;

    let result = fetcher()
        .fetch(FetchRequest::page(format!("{}/logo.png", server.uri())))
        .await;

    assert!(!result.is_ok());
    assert!(!result.has_body());
    assert!(matches!(result.failure, Some(FetchFailure::ContentMismatch(_))));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html></html>", "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let result = HttpFetcher::with_client(client)
        .fetch(FetchRequest::page(format!("{}/", server.uri())))
        .await;

    assert_eq!(result.failure, Some(FetchFailure::Timeout));
    assert!(result.body.is_empty());
}

#[tokio::test]
async fn test_unreachable_host() {
    let result = fetcher()
        .fetch(FetchRequest::page("http://127.0.0.1:1/"))
        .await;

    assert!(!result.is_ok());
    assert_eq!(result.status, None);
}

#[tokio::test]
async fn test_default_user_agent_identifies_crawler() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestTrawler/1.0 (+https://example.com/about)"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_http_client(&create_test_config("./unused")).unwrap();
    let result = HttpFetcher::with_client(client)
        .fetch(FetchRequest::page(format!("{}/", server.uri())))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_request_user_agent_overrides_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher()
        .fetch(
            FetchRequest::page(format!("{}/profile", server.uri())).with_user_agent("Mozilla/5.0"),
        )
        .await;

    assert!(result.is_ok());
}
