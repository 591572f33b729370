//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract, aggregate and report cycle end-to-end.

use semi_scrape::config::{Config, CrawlerConfig, DomainPolicy};
use semi_scrape::crawler::{run_crawl, Coordinator};
use semi_scrape::output::CsvReport;
use semi_scrape::state::SkipReason;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with fast retries and no domain policies
fn create_test_config(max_attempts: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            max_attempts,
            retry_backoff_ms: 10,
            max_backoff_ms: 20,
            ..CrawlerConfig::default()
        },
        domains: vec![],
        ..Config::default()
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_missing_meta_description_uses_sentinel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(html_page(
            "<html><head><title>T</title></head><body><h1>H</h1></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/p1", mock_server.uri());
    let report = run_crawl(create_test_config(3), &[url.clone()])
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.rows.len(), 1);
    let row = &report.rows[0];
    assert_eq!(row.h1, "H");
    assert_eq!(row.meta_description, "{no_meta_des}");
    assert_eq!(row.title, "T");
    assert_eq!(row.url, url);
    assert_eq!(report.stats.scraped, 1);
}

#[tokio::test]
async fn test_all_fields_extracted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><head>
                <title> Home </title>
                <meta name="Description" content="Chips and boards">
            </head><body><h1></h1><h1>Welcome</h1></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let report = run_crawl(create_test_config(3), &[url])
        .await
        .expect("Crawl should succeed");

    let row = &report.rows[0];
    assert_eq!(row.h1, "Welcome");
    assert_eq!(row.meta_description, "Chips and boards");
    assert_eq!(row.title, "Home");
}

#[tokio::test]
async fn test_server_error_is_skipped_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/x", mock_server.uri());
    let report = run_crawl(create_test_config(5), &[url.clone()])
        .await
        .expect("Crawl should succeed");

    let row = &report.rows[0];
    assert_eq!(row.h1, "{skip_500}");
    assert_eq!(row.meta_description, "{skip_500}");
    assert_eq!(row.title, "{skip_500}");
    assert_eq!(row.url, url);
    assert_eq!(report.stats.skipped_by_status.get(&500), Some(&1));
    assert_eq!(report.stats.retries, 0);
}

#[tokio::test]
async fn test_not_found_is_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/gone", mock_server.uri());
    let report = run_crawl(create_test_config(3), &[url])
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.rows[0].title, "{skip_404}");
}

#[tokio::test]
async fn test_request_timeout_status_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(408))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page(
            "<html><head><title>Later</title></head><body><h1>Ok</h1></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/slow", mock_server.uri());
    let coordinator = Coordinator::new(create_test_config(3)).expect("Coordinator should build");
    let report = coordinator.run(&[url]).await;

    let row = &report.rows[0];
    assert_eq!(row.h1, "Ok");
    assert_eq!(row.title, "Later");
    assert_eq!(report.stats.retries, 1);
    assert_eq!(report.stats.attempts, 2);
    assert!(coordinator.tracker().is_done());
}

#[tokio::test]
async fn test_persistent_retryable_failure_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(408))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/never", mock_server.uri());
    let coordinator = Coordinator::new(create_test_config(2)).expect("Coordinator should build");
    let report = coordinator.run(&[url.clone()]).await;

    let row = &report.rows[0];
    assert_eq!(row.h1, "{skip_retry_exhausted}");
    assert_eq!(row.meta_description, "{skip_retry_exhausted}");
    assert_eq!(row.title, "{skip_retry_exhausted}");

    let record = coordinator.store().get(&url).expect("Record should exist");
    assert_eq!(record.skip, Some(SkipReason::RetryExhausted));
    assert_eq!(report.stats.retry_exhausted, 1);
}

#[tokio::test]
async fn test_every_url_is_resolved_before_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html_page(
            "<html><head><title>Page</title></head><body><h1>Body</h1></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let mut urls: Vec<String> = (0..20)
        .map(|i| format!("{}/page{}", mock_server.uri(), i))
        .collect();
    urls.push(format!("{}/bad", mock_server.uri()));
    urls.push("not a url".to_string());

    let coordinator = Coordinator::new(create_test_config(3)).expect("Coordinator should build");
    let report = coordinator.run(&urls).await;

    assert_eq!(report.rows.len(), 22);
    assert_eq!(coordinator.store().terminal_count(), 22);
    assert_eq!(coordinator.tracker().outstanding(), 0);
    assert_eq!(report.stats.scraped, 20);
    assert_eq!(report.stats.skipped(), 2);

    // Rows come back in input order
    let order: Vec<&str> = report.rows.iter().map(|r| r.url.as_str()).collect();
    let expected: Vec<&str> = urls.iter().map(String::as_str).collect();
    assert_eq!(order, expected);
}

#[tokio::test]
async fn test_duplicate_url_yields_one_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page(
            "<html><head><title>Same</title></head><body><h1>Same</h1></body></html>",
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/dup", mock_server.uri());
    let urls = vec![url.clone(), format!("  {}  ", url)];
    let report = run_crawl(create_test_config(3), &urls)
        .await
        .expect("Crawl should succeed");

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].title, "Same");
    assert_eq!(report.stats.total_urls, 2);
    assert_eq!(report.stats.distinct_urls, 1);
}

#[tokio::test]
async fn test_domain_policy_spaces_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page("<html><head><title>T</title></head></html>"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(3);
    config.domains = vec![DomainPolicy::new("127.0.0.*", 1, 100, 0)];

    let urls: Vec<String> = (0..3)
        .map(|i| format!("{}/p{}", mock_server.uri(), i))
        .collect();

    let start = Instant::now();
    let report = run_crawl(config, &urls).await.expect("Crawl should succeed");

    // Three requests through one slot wait out two full delays
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert_eq!(report.stats.scraped, 3);
}

#[tokio::test]
async fn test_report_written_to_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(
            r#"<html><head><title>T</title><meta name="description" content="D"></head><body><h1>H</h1></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/err"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = temp_dir.path().join("output.csv");
    let report_file = CsvReport::create(&output).expect("Report file should be created");

    let ok = format!("{}/ok", mock_server.uri());
    let err = format!("{}/err", mock_server.uri());
    let report = run_crawl(create_test_config(3), &[ok.clone(), err.clone()])
        .await
        .expect("Crawl should succeed");
    report_file.write(&report.rows).expect("Report should be written");

    let content = std::fs::read_to_string(&output).expect("Report should be readable");
    let expected = format!(
        "h1,meta_des,title,URL\nH,D,T,{}\n{{skip_500}},{{skip_500}},{{skip_500}},{}\n",
        ok, err
    );
    assert_eq!(content, expected);
}
