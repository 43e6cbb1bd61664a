use crate::{create_test_config, mount_html};
use contact_trawl::crawler::{Discoverer, HttpFetcher, NullSink};
use contact_trawl::{InputRecord, Tier};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn discoverer() -> Discoverer<HttpFetcher> {
    let fetcher = HttpFetcher::new(&create_test_config("./unused")).unwrap();
    Discoverer::new(fetcher, "Mozilla/5.0", Arc::new(NullSink))
}

/// Website value as a user would type it: host and port, no scheme
fn website(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

#[tokio::test]
async fn test_homepage_email() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><body>
        <a href="mailto:Info@Acme.com?subject=Hi">Email us</a>
        <a href="/contact">Contact</a>
        </body></html>"#,
    )
    .await;

    let discovery = discoverer()
        .discover(&InputRecord::new(format!("{}/products/list", website(&server))))
        .await;

    assert_eq!(discovery.tier, Tier::Homepage);
    assert_eq!(discovery.output.email_joined, "info@acme.com");
    assert_eq!(discovery.fetches, 1);
}

#[tokio::test]
async fn test_contact_page_email() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<a href="/about">About</a><a href="contact-us">Contact</a>"#,
    )
    .await;
    mount_html(
        &server,
        "/contact-us",
        r#"<a href="mailto:sales@acme.com">Sales</a><a href="mailto:help@acme.com">Help</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let discovery = discoverer()
        .discover(&InputRecord::new(server.uri()))
        .await;

    assert_eq!(discovery.tier, Tier::Contact);
    assert_eq!(discovery.output.email_joined, "sales@acme.com, help@acme.com");
}

#[tokio::test]
async fn test_about_page_after_failing_contact_page() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<a href="/contact">Contact</a><a href="/about-us">About</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "application/pdf"))
        .mount(&server)
        .await;
    mount_html(&server, "/about-us", r#"<a href="mailto:team@acme.com">Team</a>"#).await;

    let discovery = discoverer()
        .discover(&InputRecord::new(server.uri()))
        .await;

    assert_eq!(discovery.tier, Tier::About);
    assert_eq!(discovery.output.email_joined, "team@acme.com");
    assert_eq!(discovery.failed_fetches, 1);
}

#[tokio::test]
async fn test_social_profile_email() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        &format!(
            r#"<a href="{}/facebook.com/acme">Find us on Facebook</a>"#,
            server.uri()
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/facebook.com/acme"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<div>Contact info</div><span>Owner@Acme-Bakery.com</span>"#,
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let discovery = discoverer()
        .discover(&InputRecord::new(server.uri()))
        .await;

    assert_eq!(discovery.tier, Tier::Social);
    assert_eq!(discovery.output.email_joined, "owner@acme-bakery.com");
    assert_eq!(discovery.output.social_link_saved, "");
}

#[tokio::test]
async fn test_exhausted_keeps_first_social_link() {
    let server = MockServer::start().await;
    let first = format!("{}/facebook.com/acme", server.uri());
    let second = format!("{}/fb.com/acme", server.uri());
    mount_html(
        &server,
        "/",
        &format!(r#"<a href="{}">FB</a><a href="{}">FB again</a>"#, first, second),
    )
    .await;
    mount_html(&server, "/facebook.com/acme", "<html>No details here</html>").await;
    mount_html(&server, "/fb.com/acme", "<html>Nothing either</html>").await;

    let discovery = discoverer()
        .discover(&InputRecord::new(server.uri()))
        .await;

    assert_eq!(discovery.tier, Tier::Exhausted);
    assert_eq!(discovery.output.email_joined, "");
    assert_eq!(discovery.output.social_link_saved, first);
    assert_eq!(discovery.fetches, 3);
}

#[tokio::test]
async fn test_unreachable_site_gives_empty_output() {
    let discovery = discoverer()
        .discover(&InputRecord::new("127.0.0.1:1"))
        .await;

    assert_eq!(discovery.tier, Tier::Exhausted);
    assert_eq!(discovery.output.email_joined, "");
    assert_eq!(discovery.output.social_link_saved, "");
    assert_eq!(discovery.fetches, 1);
    assert_eq!(discovery.failed_fetches, 1);
}
