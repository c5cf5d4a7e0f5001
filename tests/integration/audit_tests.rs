//! End-to-end audit tests
//!
//! These tests use wiremock to serve both the audited pages and the model
//! endpoint, then run the production pipeline from a TOML config and a CSV
//! URL list through to the report files.

use content_auditor::config::load_config;
use content_auditor::input::load_urls;
use content_auditor::output::{top_issues, write_reports};
use content_auditor::pipeline::{BatchRunner, PagePipeline, RunOptions};
use content_auditor::tone::UNABLE_TO_ANALYZE;
use content_auditor::{BudgetManager, Cache, Config};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GOOD_PAGE: &str = r#"<html>
<head>
  <title>Audited page with a reasonably descriptive title</title>
  <link rel="canonical" href="https://site.example/good">
</head>
<body>
  <main>
    <h1>Welcome</h1>
    <h2>Details</h2>
    <p>This page has enough text to extract and score.</p>
    <img src="a.png" alt="A diagram">
    <a href="/more">Read the full pricing guide</a>
  </main>
</body>
</html>"#;

const TONE_JSON: &str =
    r#"{"readability": "Short and clear.", "tone": "Informative.", "risks": "None noted."}"#;

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_model(server: &MockServer, model_output: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({ "stream": false })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": model_output })),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let file = dir.join(name);
    fs::write(&file, contents).unwrap();
    file
}

fn write_config(dir: &Path, server: &MockServer, max_calls: u64) -> Config {
    let toml = format!(
        r#"
[audit]
max-pages = 10
batch-size = 2

[budget]
max-llm-calls = {max_calls}

[fetch]
timeout-seconds = 5

[tone]
base-url = "{base}"
timeout-seconds = 5

[output]
cache-dir = "{cache}"
reports-dir = "{reports}"
"#,
        base = server.uri(),
        cache = dir.join("cache").display(),
        reports = dir.join("reports").display(),
    );
    load_config(&write_file(dir, "audit.toml", &toml)).unwrap()
}

fn runner(config: &Config) -> BatchRunner {
    BatchRunner::new(
        PagePipeline::from_config(config).unwrap(),
        Cache::new(&config.output.cache_dir).unwrap(),
        BudgetManager::new(config.budget.max_llm_calls),
        RunOptions::from_config(config),
    )
}

#[tokio::test]
async fn test_full_audit_writes_reports() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/good", GOOD_PAGE).await;
    mount_page(&server, "/bare", "<html><body><p>Just a few words here.</p></body></html>").await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_model(&server, TONE_JSON, 2).await;

    let config = write_config(dir.path(), &server, 10);
    let csv = format!(
        "url,label\n{0}/good,good\n{0}/gone,gone\n{0}/bare,bare\n",
        server.uri()
    );
    let urls = load_urls(write_file(dir.path(), "urls.csv", &csv)).unwrap();

    let runner = runner(&config);
    let report = runner.run(&urls).await;

    assert_eq!(report.results.len(), 3);
    assert!(!report.stopped_on_budget);
    assert_eq!(report.failures, 1);
    assert_eq!(report.audited, 2);

    let good = &report.results[0];
    assert!(good.error.is_none());
    assert_eq!(good.tone_summary.as_ref().unwrap().tone, "Informative.");
    assert!(!good.issues.contains(&"Missing H1 tag".to_string()));

    let gone = &report.results[1];
    assert_eq!(gone.error.as_deref(), Some("Failed to fetch page"));
    assert!(gone.tone_summary.is_none());

    let bare = &report.results[2];
    assert!(bare.issues.contains(&"Missing title tag".to_string()));
    assert!(bare.issues.contains(&"Missing H1 tag".to_string()));

    // Only the two successful pages are cached
    assert_eq!(runner.cache().stats().entry_count, 2);
    assert_eq!(runner.budget().stats().calls_made, 2);

    let paths = write_reports(Path::new(&config.output.reports_dir), &report.results).unwrap();
    let jsonl = fs::read_to_string(&paths.jsonl).unwrap();
    assert_eq!(jsonl.lines().count(), 3);
    let summary = fs::read_to_string(&paths.summary).unwrap();
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows[0], "URL,SEO Score,A11y Score,Issues Count,Has Tone Analysis");
    assert!(rows[1].ends_with(",Yes"));
    assert!(rows[2].ends_with(",0.0,0.0,0,No"));

    let top = top_issues(&report.results, 10);
    assert!(top.iter().any(|(issue, _)| issue == "Missing title tag"));
}

#[tokio::test]
async fn test_malformed_model_output_becomes_placeholder() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/good", GOOD_PAGE).await;
    mount_model(&server, "I think the tone is fine!", 1).await;

    let config = write_config(dir.path(), &server, 5);
    let urls = vec![format!("{}/good", server.uri())];

    let report = runner(&config).run(&urls).await;

    let tone = report.results[0].tone_summary.as_ref().unwrap();
    assert_eq!(tone.readability, UNABLE_TO_ANALYZE);
    assert_eq!(tone.risks, "Analysis failed - JSON parse error");
}

#[tokio::test]
async fn test_model_outage_does_not_spend_budget() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_page(&server, "/good", GOOD_PAGE).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(dir.path(), &server, 1);
    let urls = vec![format!("{}/good", server.uri())];

    let runner = runner(&config);
    let report = runner.run(&urls).await;

    assert!(report.results[0].error.is_none());
    assert!(report.results[0].tone_summary.is_none());
    assert_eq!(runner.budget().stats().calls_made, 0);
    assert_eq!(runner.cache().stats().entry_count, 1);
}

#[tokio::test]
async fn test_rerun_uses_cache_without_network() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GOOD_PAGE))
        .expect(1)
        .mount(&server)
        .await;
    mount_model(&server, TONE_JSON, 1).await;

    let config = write_config(dir.path(), &server, 5);
    let urls = vec![format!("{}/good", server.uri())];

    let first = runner(&config).run(&urls).await;
    let second = runner(&config).run(&urls).await;

    assert_eq!(second.cache_hits, 1);
    assert_eq!(first.results, second.results);
}
