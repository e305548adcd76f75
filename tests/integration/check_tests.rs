//! Integration tests for the checker
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! load, normalize, schedule and check cycle end-to-end. Every mock server
//! listens on its own port and is therefore its own host.

use linkchecker::checker::{check_source, run_checks, LinkSource};
use linkchecker::config::CheckerConfig;
use linkchecker::output::CollectingSink;
use linkchecker::url::{IgnoreSet, Link};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration that does not pause between requests
fn create_test_config() -> CheckerConfig {
    CheckerConfig {
        timeout_secs: 5,
        wait_secs: 0,
        user_agent: "TestAgent/1.0".to_string(),
        ..CheckerConfig::default()
    }
}

/// Host key of a mock server, as used by the ignore set
fn host_of(server: &MockServer) -> String {
    Link::parse(&server.uri()).unwrap().host().as_str().to_string()
}

async fn mount_ok(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(server)
        .await;
}

fn sorted(mut lines: Vec<String>) -> Vec<String> {
    lines.sort();
    lines
}

/// Responds 200 and records when each request arrived
#[derive(Clone, Default)]
struct ArrivalRecorder {
    arrivals: Arc<Mutex<Vec<Instant>>>,
    delay: Duration,
}

impl Respond for ArrivalRecorder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200).set_delay(self.delay)
    }
}

#[tokio::test]
async fn test_page_links_resolved_deduplicated_and_checked() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r##"<html><body>
            <a href="/x">relative</a>
            <a href="{}/x">absolute</a>
            <a href="{}/y">other host</a>
            <a href="#frag">fragment</a>
            </body></html>"##,
            server_a.uri(),
            server_b.uri()
        )))
        .mount(&server_a)
        .await;

    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server_a)
        .await;
    Mock::given(method("GET"))
        .and(path("/y"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server_b)
        .await;

    let sink = Arc::new(CollectingSink::new());
    let source = LinkSource::Url(format!("{}/", server_a.uri()));
    let summary = check_source(&source, &IgnoreSet::new(), &create_test_config(), sink.clone())
        .await
        .expect("Check should succeed");

    assert_eq!(
        sorted(sink.lines()),
        sorted(vec![
            format!("[OK] {}/x", server_a.uri()),
            format!("[OK] {}/y", server_b.uri()),
        ])
    );
    assert_eq!(summary.hosts, 2);
    assert_eq!(summary.checked, 2);
    assert_eq!(summary.ok, 2);
    assert!(!sink.saw_no_links());
}

#[tokio::test]
async fn test_ignored_host_is_never_contacted() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;

    mount_ok(&server_a, "/x").await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server_b)
        .await;

    let ignore: IgnoreSet = [host_of(&server_b).as_str()].into_iter().collect();
    let base = Url::parse(&format!("{}/", server_a.uri())).unwrap();
    let raw = ["/x".to_string(), format!("{}/y", server_b.uri())];

    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &raw, &ignore, &create_test_config(), sink.clone()).await;

    assert_eq!(sink.lines(), [format!("[OK] {}/x", server_a.uri())]);
}

#[tokio::test]
async fn test_error_status_is_ng() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    let summary = run_checks(
        &base,
        &["/missing", "/broken"],
        &IgnoreSet::new(),
        &create_test_config(),
        sink.clone(),
    )
    .await;

    // One host, so lines arrive in dispatch order
    assert_eq!(
        sink.lines(),
        [
            format!("[NG] {}/missing (status 404)", server.uri()),
            format!("[NG] {}/broken (status 500)", server.uri()),
        ]
    );
    assert_eq!(summary.ng, 2);
}

#[tokio::test]
async fn test_redirect_to_success_is_ok() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &["/old"], &IgnoreSet::new(), &create_test_config(), sink.clone()).await;

    // The original link is reported, not the redirect target
    assert_eq!(sink.lines(), [format!("[OK] {}/old", server.uri())]);
}

#[tokio::test]
async fn test_redirect_to_missing_page_is_ng() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/gone"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &["/moved"], &IgnoreSet::new(), &create_test_config(), sink.clone()).await;

    assert_eq!(
        sink.lines(),
        [format!("[NG] {}/moved (status 410)", server.uri())]
    );
}

#[tokio::test]
async fn test_timeout_is_ng() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = CheckerConfig {
        timeout_secs: 1,
        ..create_test_config()
    };

    let base = Url::parse(&server.uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &["/slow"], &IgnoreSet::new(), &config, sink.clone()).await;

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(&format!("[NG] {}/slow (", server.uri())));
    assert!(lines[0].contains("timed out"));
}

#[tokio::test]
async fn test_connection_failure_is_ng_and_run_continues() {
    let server = MockServer::start().await;
    mount_ok(&server, "/fine").await;

    let base = Url::parse(&server.uri()).unwrap();
    let raw = ["http://127.0.0.1:1/refused".to_string(), "/fine".to_string()];

    let sink = Arc::new(CollectingSink::new());
    let summary = run_checks(&base, &raw, &IgnoreSet::new(), &create_test_config(), sink.clone())
        .await;

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines.contains(&format!("[OK] {}/fine", server.uri())));
    assert!(lines
        .iter()
        .any(|line| line.starts_with("[NG] http://127.0.0.1:1/refused (")));
    assert_eq!(summary.ok, 1);
    assert_eq!(summary.ng, 1);
}

#[tokio::test]
async fn test_requests_carry_header_profile() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("user-agent", "TestAgent/1.0"))
        .and(header("sec-fetch-dest", "document"))
        .and(header("cache-control", "max-age=0"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &["/profile"], &IgnoreSet::new(), &create_test_config(), sink.clone()).await;

    assert_eq!(sink.lines(), [format!("[OK] {}/profile", server.uri())]);
}

#[tokio::test]
async fn test_same_host_requests_are_spaced_by_wait() {
    let server = MockServer::start().await;
    let recorder = ArrivalRecorder {
        delay: Duration::from_millis(300),
        ..ArrivalRecorder::default()
    };

    Mock::given(method("GET"))
        .respond_with(recorder.clone())
        .mount(&server)
        .await;

    let config = CheckerConfig {
        wait_secs: 1,
        ..create_test_config()
    };

    let base = Url::parse(&server.uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &["/1", "/2", "/3"], &IgnoreSet::new(), &config, sink.clone()).await;

    // A fetch ends no earlier than its response delay, and the full wait
    // follows, so consecutive arrivals are at least delay + wait apart
    let arrivals = recorder.arrivals.lock().unwrap().clone();
    assert_eq!(arrivals.len(), 3);
    let min_gap = recorder.delay + config.wait();
    for pair in arrivals.windows(2) {
        let gap = pair[1].duration_since(pair[0]);
        assert!(gap >= min_gap, "requests only {:?} apart", gap);
    }

    // Per-host order is dispatch order
    assert_eq!(
        sink.lines(),
        [
            format!("[OK] {}/1", server.uri()),
            format!("[OK] {}/2", server.uri()),
            format!("[OK] {}/3", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_different_hosts_are_checked_in_parallel() {
    let mut servers = Vec::new();
    for _ in 0..3 {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(1)))
            .mount(&server)
            .await;
        servers.push(server);
    }

    let raw: Vec<String> = servers.iter().map(|s| format!("{}/slow", s.uri())).collect();
    let base = Url::parse(&servers[0].uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());

    let started = Instant::now();
    let summary = run_checks(&base, &raw, &IgnoreSet::new(), &create_test_config(), sink.clone())
        .await;
    let elapsed = started.elapsed();

    assert_eq!(summary.hosts, 3);
    assert_eq!(sink.lines().len(), 3);
    assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_max_concurrent_hosts_limits_parallelism() {
    let mut servers = Vec::new();
    for _ in 0..3 {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;
        servers.push(server);
    }

    let config = CheckerConfig {
        max_concurrent_hosts: Some(1),
        ..create_test_config()
    };

    let raw: Vec<String> = servers.iter().map(|s| format!("{}/slow", s.uri())).collect();
    let base = Url::parse(&servers[0].uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());

    let started = Instant::now();
    let summary = run_checks(&base, &raw, &IgnoreSet::new(), &config, sink.clone()).await;

    assert_eq!(summary.ok, 3);
    assert!(started.elapsed() >= Duration::from_millis(1400));
}

#[tokio::test]
async fn test_cookies_stay_with_their_host() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;

    for server in [&server_a, &server_b] {
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "session=abc; Path=/"),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/members"))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/members"))
            .respond_with(ResponseTemplate::new(403))
            .mount(server)
            .await;
    }

    // Only host A logs in; both hosts share the IP, so a shared jar would leak
    let raw = [
        format!("{}/login", server_a.uri()),
        format!("{}/members", server_a.uri()),
        format!("{}/members", server_b.uri()),
    ];
    let base = Url::parse(&server_a.uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &raw, &IgnoreSet::new(), &create_test_config(), sink.clone()).await;

    let lines = sink.lines();
    assert!(lines.contains(&format!("[OK] {}/members", server_a.uri())));
    assert!(lines.contains(&format!("[NG] {}/members (status 403)", server_b.uri())));
}

#[tokio::test]
async fn test_every_unique_link_reported_once() {
    let servers = [
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    ];

    let mut raw = Vec::new();
    for server in &servers {
        for page in ["/a", "/b", "/c", "/d"] {
            Mock::given(method("GET"))
                .and(path(page))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(server)
                .await;
            raw.push(format!("{}{}", server.uri(), page));
        }
    }
    // Duplicates collapse before scheduling
    raw.extend(raw.clone());

    let base = Url::parse(&servers[0].uri()).unwrap();
    let sink = Arc::new(CollectingSink::new());
    let summary = run_checks(&base, &raw, &IgnoreSet::new(), &create_test_config(), sink.clone())
        .await;

    assert_eq!(sink.outcomes().len(), 12);
    assert_eq!(summary.checked, 12);
    assert_eq!(summary.hosts, 3);
    assert_eq!(summary.lost_workers, 0);

    // Each host's outcomes keep that host's dispatch order
    for server in &servers {
        let own: Vec<String> = sink
            .outcomes()
            .iter()
            .filter(|(link, _)| link.as_str().starts_with(&server.uri()))
            .map(|(link, _)| link.path().to_string())
            .collect();
        assert_eq!(own, ["/a", "/b", "/c", "/d"]);
    }
}

#[tokio::test]
async fn test_exclude_internal_skips_relative_links() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server_a)
        .await;
    mount_ok(&server_b, "/y").await;

    let config = CheckerConfig {
        exclude_internal: true,
        ..create_test_config()
    };

    let base = Url::parse(&format!("{}/", server_a.uri())).unwrap();
    let raw = [
        "/x".to_string(),
        "page.html".to_string(),
        format!("{}/y", server_b.uri()),
    ];
    let sink = Arc::new(CollectingSink::new());
    run_checks(&base, &raw, &IgnoreSet::new(), &config, sink.clone()).await;

    assert_eq!(sink.lines(), [format!("[OK] {}/y", server_b.uri())]);
}

#[tokio::test]
async fn test_nothing_to_check() {
    let config = CheckerConfig {
        exclude_internal: true,
        ..create_test_config()
    };

    let base = Url::parse("http://a.test/").unwrap();
    let sink = Arc::new(CollectingSink::new());
    let summary = run_checks(
        &base,
        &["#top", "/relative", ""],
        &IgnoreSet::new(),
        &config,
        sink.clone(),
    )
    .await;

    assert!(sink.saw_no_links());
    assert!(sink.lines().is_empty());
    assert!(summary.is_empty());
}

#[tokio::test]
async fn test_check_local_file() {
    let server = MockServer::start().await;
    mount_ok(&server, "/from-file").await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"<html><body><a href="{}/from-file">x</a><a href="sibling.html">y</a></body></html>"#,
        server.uri()
    )
    .unwrap();
    file.flush().unwrap();

    // Relative links resolve to file: URLs, which are skipped here
    let config = CheckerConfig {
        exclude_internal: true,
        ..create_test_config()
    };

    let source = LinkSource::from_arg(file.path().to_str().unwrap());
    let sink = Arc::new(CollectingSink::new());
    let summary = check_source(&source, &IgnoreSet::new(), &config, sink.clone())
        .await
        .expect("Check should succeed");

    assert_eq!(sink.lines(), [format!("[OK] {}/from-file", server.uri())]);
    assert_eq!(summary.checked, 1);
}

#[tokio::test]
async fn test_unreachable_page_is_fatal() {
    let source = LinkSource::Url("http://127.0.0.1:1/".to_string());
    let sink = Arc::new(CollectingSink::new());

    let result = check_source(&source, &IgnoreSet::new(), &create_test_config(), sink.clone()).await;

    assert!(result.is_err());
    assert!(sink.outcomes().is_empty());
}
