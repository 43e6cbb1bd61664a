use crate::{create_test_config, mount_html};
use contact_trawl::crawler::{self, Tier};
use contact_trawl::storage::{JsonStore, RecordStore, Sheet};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn leads_sheet(websites: &[&str]) -> Sheet {
    let mut sheet = Sheet::new(vec!["Name".to_string(), "Business Website".to_string()]);
    for (i, website) in websites.iter().enumerate() {
        sheet.push_row(vec![format!("Business {}", i), website.to_string()]);
    }
    sheet
}

#[tokio::test]
async fn test_full_scrape_with_json_store() {
    let with_email = MockServer::start().await;
    mount_html(
        &with_email,
        "/",
        r#"<a href="mailto:hello@corner-shop.com">Say hi</a>"#,
    )
    .await;

    let social_only = MockServer::start().await;
    let profile = format!("{}/facebook.com/corner-cafe", social_only.uri());
    mount_html(&social_only, "/", &format!(r#"<a href="{}">FB</a>"#, profile)).await;
    mount_html(&social_only, "/facebook.com/corner-cafe", "<html>Closed</html>").await;

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("sheets");
    let config = create_test_config(&store_path.display().to_string());

    let mut store = JsonStore::new(&store_path).unwrap();
    store
        .write_sheet(
            "Sheet1",
            &leads_sheet(&[&with_email.uri(), "", "ftp://files.example.com", &social_only.uri()]),
        )
        .unwrap();

    let stats = crawler::scrape(config, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stats.total_records, 4);
    assert_eq!(stats.completed, 4);
    assert_eq!(stats.emails_found, 1);
    assert_eq!(stats.social_links_saved, 1);
    assert_eq!(stats.tier_count(Tier::Unscrapable), 2);

    let sheet = store.read_sheet("Sheet1").unwrap();
    let email = sheet.column("Business Email").unwrap();
    let social = sheet.column("Facebook Link").unwrap();
    assert_eq!(sheet.cell(0, email), "hello@corner-shop.com");
    assert_eq!(sheet.cell(1, email), "");
    assert_eq!(sheet.cell(2, email), "");
    assert_eq!(sheet.cell(3, email), "");
    assert_eq!(sheet.cell(3, social), profile);

    let filtered = store.read_sheet("Emails Only").unwrap();
    assert_eq!(filtered.row_count(), 1);
    assert_eq!(filtered.cell(0, 0), "Business 0");
}

#[tokio::test]
async fn test_filter_job_without_scrape() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("sheets");
    let config = create_test_config(&store_path.display().to_string());

    let mut sheet = leads_sheet(&["a.com", "b.com", "c.com"]);
    let email = sheet.ensure_column("Business Email");
    sheet.set_cell(1, email, "owner@b.com");

    let mut store = JsonStore::new(&store_path).unwrap();
    store.write_sheet("Sheet1", &sheet).unwrap();

    assert_eq!(crawler::filter(config).unwrap(), 1);

    let filtered = store.read_sheet("Emails Only").unwrap();
    assert_eq!(filtered.headers, sheet.headers);
    assert_eq!(filtered.cell(0, 1), "b.com");
}

#[tokio::test]
async fn test_scrape_missing_sheet_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&dir.path().display().to_string());

    let result = crawler::scrape(config, &CancellationToken::new()).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_profile_follow_up_writes_found_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/facebook.com/corner-cafe"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<div>Reach us at Orders@Corner-Cafe.com or jobs@corner-cafe.com</div>",
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/facebook.com/quiet-deli", "<html>No contact</html>").await;

    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("sheets");
    let config = create_test_config(&store_path.display().to_string());

    let mut sheet = leads_sheet(&["cafe.com", "deli.com", "shop.com"]);
    let email = sheet.ensure_column("Business Email");
    let social = sheet.ensure_column("Facebook Link");
    sheet.set_cell(0, social, format!("{}/facebook.com/corner-cafe", server.uri()));
    sheet.set_cell(1, social, format!("{}/facebook.com/quiet-deli", server.uri()));
    sheet.set_cell(2, email, "owner@shop.com");

    let mut store = JsonStore::new(&store_path).unwrap();
    store.write_sheet("Sheet1", &sheet).unwrap();

    let stats = crawler::follow_up_profiles(config, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(stats.leads, 2);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.emails_found, 1);
    assert!(!stats.cancelled);

    let updated = store.read_sheet("Sheet1").unwrap();
    assert_eq!(updated.cell(0, email), "orders@corner-cafe.com");
    assert_eq!(updated.cell(1, email), "");
    assert_eq!(updated.cell(2, email), "owner@shop.com");

    let filtered = store.read_sheet("Emails Only").unwrap();
    assert_eq!(filtered.row_count(), 2);
    assert_eq!(filtered.cell(0, 0), "Business 0");
    assert_eq!(filtered.cell(1, 0), "Business 2");
}
