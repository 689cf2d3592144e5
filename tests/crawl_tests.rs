//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl-and-rank cycle end-to-end.

use std::time::Duration;
use wiki_ranker::config::{Config, CrawlerConfig, RetryConfig};
use wiki_ranker::graph::SequentialInverter;
use wiki_ranker::{count_rank, run};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration
fn create_test_config() -> Config {
    Config {
        crawler: CrawlerConfig {
            max_workers: 4,
            max_request_rate: 4,
            min_request_interval: 0,
            request_timeout: 2.0,
            ..CrawlerConfig::default()
        },
        retry: RetryConfig {
            max_attempts: 2,
            delay: 10,
            backoff: 1.0,
        },
        ..Config::default()
    }
}

/// Renders a wiki page linking to the given titles
fn wiki_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|title| format!(r#"<a href="/wiki/{}">{}</a>"#, title, title))
        .collect();
    format!(
        r#"<html><head><title>Page</title></head><body>
        <a href="/wiki/Special:Random">Random</a>
        {}
        <a href="https://elsewhere.org/wiki/External">External</a>
        </body></html>"#,
        anchors
    )
}

async fn mount_page(server: &MockServer, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/wiki/{}", title)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(wiki_page(links))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_and_rank() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "Start", &["A", "B"]).await;
    mount_page(&mock_server, "A", &["B"]).await;
    mount_page(&mock_server, "B", &["Start", "Missing"]).await;

    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let start = format!("{}/wiki/Start", base_url);
    let links = run(&start, 10, &create_test_config())
        .await
        .expect("Crawl should succeed");

    let page = |title: &str| format!("{}/wiki/{}", base_url, title);

    assert_eq!(links.len(), 3);
    assert_eq!(links[&page("Start")], vec![page("A"), page("B")]);
    assert_eq!(links[&page("A")], vec![page("B")]);
    assert_eq!(links[&page("B")], vec![page("Start"), page("Missing")]);
    assert!(!links.contains_key(&page("Missing")));

    let ranks = count_rank(&links, &SequentialInverter).expect("Inversion should succeed");
    assert_eq!(ranks[&page("B")], 2);
    assert_eq!(ranks[&page("A")], 1);
    assert_eq!(ranks[&page("Start")], 1);
    assert_eq!(ranks[&page("Missing")], 1);
}

#[tokio::test]
async fn test_page_limit_one_fetches_only_start() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Start"))
        .respond_with(ResponseTemplate::new(200).set_body_string(wiki_page(&["A", "B"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/A"))
        .respond_with(ResponseTemplate::new(200).set_body_string(wiki_page(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let start = format!("{}/wiki/Start", mock_server.uri());
    let links = run(&start, 1, &create_test_config()).await.unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(links[&start].len(), 2);
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let mock_server = MockServer::start().await;

    // First request fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/wiki/Start"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "Start", &["A"]).await;
    mount_page(&mock_server, "A", &[]).await;

    let start = format!("{}/wiki/Start", mock_server.uri());
    let links = run(&start, 10, &create_test_config()).await.unwrap();

    assert_eq!(links.len(), 1);
    assert!(links.contains_key(&start));
}

#[tokio::test]
async fn test_permanent_failure_does_not_abort_wave() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "Start", &["Broken", "A"]).await;
    mount_page(&mock_server, "A", &["Start"]).await;

    Mock::given(method("GET"))
        .and(path("/wiki/Broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let start = format!("{}/wiki/Start", mock_server.uri());
    let links = run(&start, 10, &create_test_config()).await.unwrap();

    assert_eq!(links.len(), 2);
    assert!(links.contains_key(&format!("{}/wiki/A", mock_server.uri())));
}

#[tokio::test]
async fn test_pacing_bounds_task_duration() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "Start", &["A"]).await;
    mount_page(&mock_server, "A", &[]).await;

    let mut config = create_test_config();
    config.crawler.min_request_interval = 100;

    let start = format!("{}/wiki/Start", mock_server.uri());
    let started = std::time::Instant::now();
    run(&start, 10, &config).await.unwrap();

    // Two waves of one paced task each
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_whitespace_variants_are_deduplicated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Start"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/wiki/Grand Theory">one</a><a href="/wiki/Grand%20Theory">two</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Grand_Theory"))
        .respond_with(ResponseTemplate::new(200).set_body_string(wiki_page(&["Start"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let start = format!("{}/wiki/Start", mock_server.uri());
    let links = run(&start, 10, &create_test_config()).await.unwrap();

    let grand = format!("{}/wiki/Grand_Theory", mock_server.uri());
    assert_eq!(links[&start], vec![grand.clone(), grand]);
    assert_eq!(links.len(), 2);
}

#[tokio::test]
async fn test_invalid_start_url_is_rejected() {
    let result = run("ftp://example.com/wiki/Start", 10, &create_test_config()).await;
    assert!(result.is_err());
}
