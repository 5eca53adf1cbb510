//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the tool directory and run the
//! full crawl cycle end-to-end, with a manual clock so request spacing is
//! checked without real waiting.

use ai_tool_finder::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use ai_tool_finder::crawler::{Coordinator, CrawlPhase, ManualClock, SITEMAP_NS};
use ai_tool_finder::storage::{open_storage, Storage};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, db_path: &Path, max_tools: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_url: base_url.to_string(),
            crawl_delay: 5,
            max_tools,
            request_timeout: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            database_url: format!("sqlite:///{}", db_path.display()),
        },
    }
}

fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="{}">{}</sitemapindex>"#,
        SITEMAP_NS, entries
    )
}

fn url_set(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="{}">{}</urlset>"#,
        SITEMAP_NS, entries
    )
}

fn tool_page(name: &str, description: &str, categories: &[&str]) -> String {
    let links: String = categories
        .iter()
        .map(|c| format!(r#"<a class="category-link" href="/c/{}">{}</a>"#, c, c))
        .collect();
    format!(
        r#"<html><head><title>{} | Directory</title>
        <meta name="description" content="{}"></head>
        <body><h1>{}</h1><div><span>Free trial</span></div>{}</body></html>"#,
        name, description, name, links
    )
}

async fn mount_get(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    mount_get(server, "/robots.txt", 200, body.to_string()).await;
}

#[tokio::test]
async fn test_full_crawl_saves_tools_and_categories() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tools.db");

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_get(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&[
            format!("{}/sitemap_pages.xml", base),
            format!("{}/sitemap_tools_1.xml", base),
            format!("{}/sitemap_tools_2.xml", base),
        ]),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_tools_1.xml",
        200,
        url_set(&[format!("{}/tool/acme", base), format!("{}/tool/beta", base)]),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_tools_2.xml",
        200,
        url_set(&[format!("{}/tool/gamma", base)]),
    )
    .await;
    let acme = tool_page("Acme AI", "Great tool", &["LLM", "Writing"]);
    mount_get(&server, "/tool/acme", 200, acme).await;
    mount_get(&server, "/tool/beta", 200, tool_page("Beta", "Chat helper", &["LLM"])).await;
    mount_get(&server, "/tool/gamma", 200, tool_page("Gamma", "Image maker", &[])).await;
    Mock::given(method("GET"))
        .and(path("/sitemap_pages.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let config = create_test_config(&base, &db_path, 100);
    let mut coordinator = Coordinator::with_clock(config, clock.clone()).await.unwrap();

    let report = coordinator.run().await;

    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(report.sitemaps_processed, 2);
    assert_eq!(report.urls_seen, 3);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.tools_saved, 3);
    assert!(!report.cap_reached);

    // sitemap index, 2 sitemaps, 3 pages: 6 gated requests, 5 waits
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 5]);

    let storage = coordinator.into_storage();
    assert_eq!(storage.count_tools().unwrap(), 3);
    assert_eq!(storage.count_categories().unwrap(), 2);
    assert_eq!(storage.count_associations().unwrap(), 3);

    let acme = storage
        .get_tool_by_url(&format!("{}/tool/acme", base))
        .unwrap()
        .unwrap();
    assert_eq!(acme.name, "Acme AI");
    assert_eq!(acme.description.as_deref(), Some("Great tool"));
    assert_eq!(acme.pricing.as_deref(), Some("Free trial"));
    assert_eq!(acme.category_names(), vec!["LLM", "Writing"]);

    let llm = storage.get_category_by_name("LLM").unwrap().unwrap();
    assert_eq!(llm.tool_count, 2);

    let hits = storage.search_tools("image", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Gamma");
}

#[tokio::test]
async fn test_robots_denied_url_is_never_requested() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_robots(&server, "User-agent: *\nDisallow: /tool/secret").await;
    mount_get(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&[format!("{}/sitemap_tools_1.xml", base)]),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_tools_1.xml",
        200,
        url_set(&[format!("{}/tool/secret", base), format!("{}/tool/open", base)]),
    )
    .await;
    mount_get(&server, "/tool/open", 200, tool_page("Open Tool", "Public", &[])).await;
    Mock::given(method("GET"))
        .and(path("/tool/secret"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let config = create_test_config(&base, &dir.path().join("tools.db"), 100);
    let mut coordinator = Coordinator::with_clock(config, clock.clone()).await.unwrap();

    let report = coordinator.run().await;

    assert_eq!(report.urls_seen, 2);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.tools_saved, 1);
    // The denied URL does not count as a request: index, sitemap, open page
    assert_eq!(clock.sleeps().len(), 2);
    assert!(coordinator
        .storage()
        .get_tool_by_url(&format!("{}/tool/secret", base))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_max_tools_stops_after_one_save() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_robots(&server, "").await;
    mount_get(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&[
            format!("{}/sitemap_tools_1.xml", base),
            format!("{}/sitemap_tools_2.xml", base),
        ]),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_tools_1.xml",
        200,
        url_set(&[format!("{}/tool/first", base), format!("{}/tool/second", base)]),
    )
    .await;
    mount_get(&server, "/tool/first", 200, tool_page("First", "One", &[])).await;
    Mock::given(method("GET"))
        .and(path("/tool/second"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_tools_2.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&base, &dir.path().join("tools.db"), 1);
    let mut coordinator = Coordinator::with_clock(config, ManualClock::new()).await.unwrap();

    let report = coordinator.run().await;

    assert_eq!(report.tools_saved, 1);
    assert!(report.cap_reached);
    assert_eq!(report.urls_seen, 1);
    assert_eq!(coordinator.tools_saved(), 1);
    assert_eq!(coordinator.storage().count_tools().unwrap(), 1);
}

#[tokio::test]
async fn test_second_run_finds_existing_tools() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tools.db");

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_get(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&[format!("{}/sitemap_tools_1.xml", base)]),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_tools_1.xml",
        200,
        url_set(&[format!("{}/tool/acme", base), format!("{}/tool/beta", base)]),
    )
    .await;
    mount_get(&server, "/tool/acme", 200, tool_page("Acme AI", "Great tool", &["LLM"])).await;
    mount_get(&server, "/tool/beta", 200, tool_page("Beta", "Helper", &["LLM"])).await;

    let config = create_test_config(&base, &db_path, 100);
    let first = Coordinator::with_clock(config, ManualClock::new())
        .await
        .unwrap()
        .run()
        .await;
    assert_eq!(first.tools_saved, 2);

    let mut coordinator =
        Coordinator::with_clock(create_test_config(&base, &db_path, 100), ManualClock::new())
            .await
            .unwrap();
    let second = coordinator.run().await;

    assert_eq!(second.tools_saved, 0);
    assert_eq!(second.already_present, 2);

    let storage = open_storage(&format!("sqlite:///{}", db_path.display())).unwrap();
    assert_eq!(storage.count_tools().unwrap(), 2);
    assert_eq!(storage.count_categories().unwrap(), 1);
    assert_eq!(storage.count_associations().unwrap(), 2);
}

#[tokio::test]
async fn test_failed_and_nameless_pages_are_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_get(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&[format!("{}/sitemap_tools_1.xml", base)]),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_tools_1.xml",
        200,
        url_set(&[
            format!("{}/tool/broken", base),
            format!("{}/tool/blank", base),
            format!("{}/tool/missing", base),
            format!("{}/tool/good", base),
        ]),
    )
    .await;
    mount_get(&server, "/tool/broken", 500, String::new()).await;
    let blank = "<html><body><p>nothing</p></body></html>".to_string();
    mount_get(&server, "/tool/blank", 200, blank).await;
    mount_get(&server, "/tool/good", 200, tool_page("Good", "Works", &[])).await;

    let config = create_test_config(&base, &dir.path().join("tools.db"), 100);
    let mut coordinator = Coordinator::with_clock(config, ManualClock::new()).await.unwrap();

    let report = coordinator.run().await;

    assert_eq!(report.urls_seen, 4);
    assert_eq!(report.fetch_failures, 2);
    assert_eq!(report.empty_records, 1);
    assert_eq!(report.tools_saved, 1);
    assert_eq!(coordinator.storage().count_tools().unwrap(), 1);
}

#[tokio::test]
async fn test_forbidden_robots_blocks_everything() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&base, &dir.path().join("tools.db"), 100);
    let mut coordinator = Coordinator::with_clock(config, ManualClock::new()).await.unwrap();

    let report = coordinator.run().await;

    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(report.sitemaps_processed, 0);
    assert_eq!(report.tools_saved, 0);
}

#[tokio::test]
async fn test_unavailable_robots_blocks_everything() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_index(&[format!(
            "{}/sitemap_tools_1.xml",
            base
        )])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_tools_1.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let config = create_test_config(&base, &dir.path().join("tools.db"), 100);
    let mut coordinator = Coordinator::with_clock(config, clock.clone()).await.unwrap();

    let report = coordinator.run().await;

    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(report.sitemaps_processed, 0);
    assert_eq!(report.tools_saved, 0);
    assert!(coordinator.fetcher().gate().last_request_time().is_none());
    assert!(clock.sleeps().is_empty());

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(requested, vec!["/robots.txt"]);
}

#[tokio::test]
async fn test_missing_robots_and_sitemap_finish_cleanly() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // Nothing mounted: every request gets a 404
    let config = create_test_config(&server.uri(), &dir.path().join("tools.db"), 100);
    let mut coordinator = Coordinator::with_clock(config, ManualClock::new()).await.unwrap();

    let report = coordinator.run().await;

    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(report.sitemaps_processed, 0);
    assert_eq!(coordinator.storage().count_tools().unwrap(), 0);
}

#[tokio::test]
async fn test_declared_crawl_delay_is_honored() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_robots(
        &server,
        "User-agent: TestBot\nCrawl-delay: 8\n\nUser-agent: *\nCrawl-delay: 1",
    )
    .await;
    mount_get(
        &server,
        "/sitemap.xml",
        200,
        sitemap_index(&[format!("{}/sitemap_tools_1.xml", base)]),
    )
    .await;
    mount_get(
        &server,
        "/sitemap_tools_1.xml",
        200,
        url_set(&[format!("{}/tool/acme", base)]),
    )
    .await;
    mount_get(&server, "/tool/acme", 200, tool_page("Acme AI", "Great tool", &[])).await;

    let clock = ManualClock::new();
    let config = create_test_config(&base, &dir.path().join("tools.db"), 100);
    let mut coordinator = Coordinator::with_clock(config, clock.clone()).await.unwrap();

    assert_eq!(coordinator.fetcher().gate().min_interval(), Duration::from_secs(8));

    coordinator.run().await;

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(8); 2]);
}
