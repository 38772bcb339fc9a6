//! Integration tests for the full check pass
//!
//! These tests use wiremock to stand in for friend sites and the remote
//! status API, and run the whole pipeline end-to-end: source ingestion,
//! tiered probing, remote fallback, reconciliation, and persistence.

use linkpulse::checker::run_check;
use linkpulse::config::{CheckerConfig, Config, OutputConfig, StatusApiConfig};
use linkpulse::report::{load_previous, save, BacklinkPresence, LinkStatus, RunReport};
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts and a local status API
fn create_test_config(source: &str, result_path: &Path, api_url: &str) -> Config {
    Config {
        source: source.to_string(),
        proxy_prefix: None,
        status_api: StatusApiConfig {
            url: api_url.to_string(),
            key: None,
        },
        author_url: None,
        checker: CheckerConfig {
            workers: 4,
            probe_timeout_secs: 5,
            api_timeout_secs: 5,
            api_interval_ms: 10,
        },
        output: OutputConfig {
            result_path: result_path.to_string_lossy().into_owned(),
        },
    }
}

fn previous_report_with(link: &str, fail_count: u32) -> RunReport {
    RunReport {
        timestamp: "2025-01-01 00:00:00".to_string(),
        accessible_count: 0,
        inaccessible_count: 1,
        total_count: 1,
        has_author_link_count: None,
        link_status: vec![LinkStatus {
            name: "seeded".to_string(),
            link: link.to_string(),
            latency: -1.0,
            fail_count,
            has_author_link: None,
            linkpage: None,
        }],
    }
}

#[tokio::test]
async fn test_full_check_with_mixed_results() {
    let sites = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&sites)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&sites)
        .await;

    let up_link = format!("{}/up", sites.uri());
    let down_link = format!("{}/down", sites.uri());

    // The failing link falls through to the status API, which also says down
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(query_param("url", &down_link))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"code": 200, "data": 403})),
        )
        .expect(1)
        .mount(&api)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("links.json");
    std::fs::write(
        &source_path,
        serde_json::json!({"link_list": [
            {"name": "A", "link": up_link},
            {"name": "B", "link": down_link},
        ]})
        .to_string(),
    )
    .unwrap();

    let result_path = dir.path().join("result.json");
    let config = create_test_config(
        source_path.to_str().unwrap(),
        &result_path,
        &format!("{}/api/status", api.uri()),
    );

    let report = run_check(&config).await.expect("check failed");

    assert_eq!(report.total_count, 2);
    assert_eq!(report.accessible_count, 1);
    assert_eq!(report.inaccessible_count, 1);

    let up = report.find(&up_link).unwrap();
    assert!(up.latency >= 0.0);
    assert_eq!(up.fail_count, 0);

    let down = report.find(&down_link).unwrap();
    assert_eq!(down.latency, -1.0);
    assert_eq!(down.fail_count, 1);

    // The persisted file matches what the run returned
    let persisted = load_previous(&result_path);
    assert_eq!(persisted, report);
}

#[tokio::test]
async fn test_fail_count_accrues_across_runs() {
    let sites = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&sites)
        .await;

    let down_link = format!("{}/gone", sites.uri());

    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"code": 500, "data": 500})),
        )
        .mount(&api)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("links.csv");
    std::fs::write(&source_path, format!("B,{}\n", down_link)).unwrap();

    let result_path = dir.path().join("result.json");
    save(&result_path, &previous_report_with(&down_link, 4)).unwrap();

    let config = create_test_config(
        source_path.to_str().unwrap(),
        &result_path,
        &format!("{}/api/status", api.uri()),
    );

    let report = run_check(&config).await.expect("check failed");

    assert_eq!(report.find(&down_link).unwrap().fail_count, 5);
}

#[tokio::test]
async fn test_stale_entries_are_pruned() {
    let sites = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&sites)
        .await;

    let kept_link = format!("{}/kept", sites.uri());

    let api = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("links.csv");
    std::fs::write(&source_path, format!("Kept,{}\n", kept_link)).unwrap();

    let result_path = dir.path().join("result.json");
    save(
        &result_path,
        &previous_report_with("https://removed.example/", 9),
    )
    .unwrap();

    let config = create_test_config(
        source_path.to_str().unwrap(),
        &result_path,
        &format!("{}/api/status", api.uri()),
    );

    let report = run_check(&config).await.expect("check failed");

    assert_eq!(report.total_count, 1);
    assert!(report.find("https://removed.example/").is_none());
    assert!(report.find(&kept_link).is_some());
}

#[tokio::test]
async fn test_remote_api_rescues_failed_link() {
    let sites = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&sites)
        .await;

    let flaky_link = format!("{}/flaky", sites.uri());

    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(query_param("url", &flaky_link))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"code": 200, "data": 200})),
        )
        .expect(1)
        .mount(&api)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("links.csv");
    std::fs::write(&source_path, format!("Flaky,{}\n", flaky_link)).unwrap();

    let result_path = dir.path().join("result.json");
    let config = create_test_config(
        source_path.to_str().unwrap(),
        &result_path,
        &format!("{}/api/status", api.uri()),
    );

    let report = run_check(&config).await.expect("check failed");

    // The resolver's verdict replaced the chain's interim failure
    let status = report.find(&flaky_link).unwrap();
    assert!(status.latency >= 0.0);
    assert_eq!(status.fail_count, 0);
    assert_eq!(report.accessible_count, 1);
    assert_eq!(report.inaccessible_count, 0);
}

#[tokio::test]
async fn test_backlink_check_end_to_end() {
    let sites = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/friend"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&sites)
        .await;
    Mock::given(method("GET"))
        .and(path("/friend/links"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="https://author.example/">the author</a></body></html>"#,
        ))
        .mount(&sites)
        .await;

    let friend_link = format!("{}/friend", sites.uri());
    let friend_page = format!("{}/friend/links", sites.uri());

    let api = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("links.csv");
    std::fs::write(
        &source_path,
        format!("Friend,{},{}\n", friend_link, friend_page),
    )
    .unwrap();

    let result_path = dir.path().join("result.json");
    let mut config = create_test_config(
        source_path.to_str().unwrap(),
        &result_path,
        &format!("{}/api/status", api.uri()),
    );
    config.author_url = Some("https://author.example".to_string());

    let report = run_check(&config).await.expect("check failed");

    let status = report.find(&friend_link).unwrap();
    assert_eq!(status.has_author_link, Some(BacklinkPresence::Linked));
    assert_eq!(status.linkpage.as_deref(), Some(friend_page.as_str()));
    assert_eq!(report.has_author_link_count, Some(1));
}

#[tokio::test]
async fn test_source_fetched_over_http() {
    let sites = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&sites)
        .await;

    let up_link = format!("{}/up", sites.uri());

    Mock::given(method("GET"))
        .and(path("/links.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "A", "link": up_link}
        ])))
        .mount(&sites)
        .await;

    let api = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let result_path = dir.path().join("result.json");
    let config = create_test_config(
        &format!("{}/links.json", sites.uri()),
        &result_path,
        &format!("{}/api/status", api.uri()),
    );

    let report = run_check(&config).await.expect("check failed");

    assert_eq!(report.total_count, 1);
    assert_eq!(report.accessible_count, 1);
}

#[tokio::test]
async fn test_unusable_source_leaves_previous_report_intact() {
    let api = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("links.csv");
    std::fs::write(&source_path, "no commas here\n").unwrap();

    let result_path = dir.path().join("result.json");
    let previous = previous_report_with("https://kept.example/", 2);
    save(&result_path, &previous).unwrap();

    let config = create_test_config(
        source_path.to_str().unwrap(),
        &result_path,
        &format!("{}/api/status", api.uri()),
    );

    let result = run_check(&config).await;
    assert!(result.is_err());

    // The aborted run must not have touched the persisted report
    assert_eq!(load_previous(&result_path), previous);
}
