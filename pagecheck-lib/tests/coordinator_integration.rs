//! Integration tests for the fallback coordinator and the performance aggregation built on it.
//!
//! The coordinator is driven with scripted collectors so that its transitions can be checked
//! without any network; the last test wires the real collectors to a mock server.

use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;
use pagecheck_lib::aggregate::performance::{FALLBACK_NOTICE, aggregate};
use pagecheck_lib::aggregate::ScoreSource;
use pagecheck_lib::facts::{
    AuditTarget, CoordinatorState, FallbackCoordinator, NoProgress, SourceCollector, SourceError, SourceResult, Supplier, inspection,
    pagespeed,
};
use pagecheck_lib::metrics::{LabMetrics, MetricSet, Provenance, StructuralSignals};
use pagecheck_lib::rules::Priority;
use core::fmt::Write as _;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Collector returning a canned result and counting how often it was asked.
struct Scripted {
    label: &'static str,
    result: SourceResult,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(label: &'static str, result: SourceResult) -> Self {
        Self {
            label,
            result,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SourceCollector for Scripted {
    fn label(&self) -> &str {
        self.label
    }

    async fn collect(&self, _target: &AuditTarget) -> SourceResult {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn target() -> AuditTarget {
    AuditTarget::new(Url::parse("https://www.example.com/").unwrap(), Duration::from_secs(5))
}

fn measured(score: f64, lcp_ms: f64, inp_ms: f64, cls: f64) -> SourceResult {
    let mut metrics = MetricSet::new(Provenance::PrimaryApi);
    metrics.score = Some(score);
    metrics.lab = LabMetrics {
        lcp_ms: Some(lcp_ms),
        inp_ms: Some(inp_ms),
        cls: Some(cls),
    };
    SourceResult::ok(metrics)
}

fn inspected(signals: StructuralSignals) -> SourceResult {
    let mut metrics = MetricSet::new(Provenance::StaticInspection);
    metrics.signals = Some(signals);
    SourceResult::ok(metrics)
}

fn quota_exceeded() -> SourceResult {
    SourceResult::failed(
        pagespeed::SERVICE_NAME,
        &SourceError::Protocol {
            status: 429,
            message: Some("Quota exceeded for quota metric 'Queries per day'".to_string()),
        },
    )
}

fn clean_page() -> StructuralSignals {
    StructuralSignals {
        html_bytes: Some(40_000),
        dom_node_estimate: Some(600),
        external_script_count: Some(4),
        sync_external_script_count: Some(0),
        third_party_script_count: Some(1),
        inline_script_bytes: Some(2_000),
        stylesheet_count: Some(1),
        preload_count: Some(2),
        images_total: Some(10),
        images_missing_dimensions: Some(0),
        ..StructuralSignals::default()
    }
}

#[tokio::test]
async fn test_fallback_never_runs_when_primaries_succeed() {
    let primaries = [
        Scripted::new("mobile", measured(65.0, 3200.0, 150.0, 0.05)),
        Scripted::new("desktop", measured(90.0, 1200.0, 80.0, 0.01)),
    ];
    let fallback = Scripted::new("fallback", inspected(clean_page()));

    let outcome = FallbackCoordinator::new(&primaries, &fallback).run(&target(), &NoProgress).await;

    assert_eq!(fallback.calls(), 0);
    assert!(primaries.iter().all(|p| p.calls() == 1));
    assert_eq!(outcome.supplier, Supplier::Primary);
    assert!(outcome.fallback.is_none());
    assert_eq!(
        outcome.trace,
        [CoordinatorState::PrimaryPending, CoordinatorState::PrimaryComplete, CoordinatorState::Done]
    );

    let result = aggregate(&outcome, false);
    assert_eq!(result.score, Some(77.5));
    assert_eq!(result.score_source, ScoreSource::Measured);
    assert_eq!(result.note, "");

    let titles: Vec<_> = result.issues.iter().map(|i| (i.priority(), i.title())).collect();
    assert_eq!(
        titles,
        [
            (Priority::High, "Mobile LCP exceeds good threshold"),
            (Priority::Medium, "Average Lighthouse performance score needs improvement"),
        ]
    );
}

#[tokio::test]
async fn test_partial_primaries_skip_fallback() {
    let primaries = [Scripted::new("mobile", quota_exceeded()), Scripted::new("desktop", measured(95.0, 1000.0, 50.0, 0.0))];
    let fallback = Scripted::new("fallback", inspected(clean_page()));

    let outcome = FallbackCoordinator::new(&primaries, &fallback).run(&target(), &NoProgress).await;

    assert_eq!(fallback.calls(), 0);
    assert_eq!(
        outcome.trace,
        [CoordinatorState::PrimaryPending, CoordinatorState::PrimaryPartial, CoordinatorState::Done]
    );

    let result = aggregate(&outcome, false);
    assert_eq!(result.score, Some(95.0));
    assert_eq!(result.note, "PageSpeed API quota exceeded");
    assert!(result.issues.is_empty());
}

#[tokio::test]
async fn test_quota_without_key_degrades_to_a_note() {
    let primaries = [Scripted::new("mobile", quota_exceeded()), Scripted::new("desktop", quota_exceeded())];
    let fallback = Scripted::new("fallback", inspected(clean_page()));

    let outcome = FallbackCoordinator::new(&primaries, &fallback).run(&target(), &NoProgress).await;

    assert_eq!(fallback.calls(), 1);
    assert_eq!(outcome.supplier, Supplier::Fallback);
    assert_eq!(
        outcome.trace,
        [
            CoordinatorState::PrimaryPending,
            CoordinatorState::PrimaryFailed,
            CoordinatorState::FallbackPending,
            CoordinatorState::FallbackComplete,
            CoordinatorState::Done,
        ]
    );

    let result = aggregate(&outcome, false);
    assert_eq!(result.note, "PageSpeed API quota exceeded");
    assert_eq!(result.count(Priority::Low), 0);
    assert_eq!(result.score_source, ScoreSource::Estimated);
    assert_eq!(result.sources.len(), 3);
}

#[tokio::test]
async fn test_quota_with_key_is_reported() {
    let primaries = [Scripted::new("mobile", quota_exceeded()), Scripted::new("desktop", quota_exceeded())];
    let fallback = Scripted::new("fallback", inspected(clean_page()));

    let outcome = FallbackCoordinator::new(&primaries, &fallback).run(&target(), &NoProgress).await;
    let result = aggregate(&outcome, true);

    let titles: Vec<_> = result.issues.iter().map(|i| i.title()).collect();
    assert_eq!(titles, ["Mobile CWV API data unavailable", "Desktop CWV API data unavailable"]);
    assert!(result.issues.iter().all(|i| i.priority() == Priority::Low));
    assert_eq!(result.note, "");
}

#[tokio::test]
async fn test_everything_failing_still_produces_a_result() {
    let transport = SourceResult::failed(pagespeed::SERVICE_NAME, &SourceError::Transport("connection reset".to_string()));
    let primaries = [Scripted::new("mobile", transport.clone()), Scripted::new("desktop", transport)];
    let fallback = Scripted::new(
        "fallback",
        SourceResult::failed(inspection::SERVICE_NAME, &SourceError::Transport("dns error".to_string())),
    );

    let outcome = FallbackCoordinator::new(&primaries, &fallback).run(&target(), &NoProgress).await;
    assert_eq!(outcome.supplier, Supplier::None);

    let result = aggregate(&outcome, false);
    assert_eq!(result.score, None);
    assert_eq!(result.score_source, ScoreSource::None);
    assert_eq!(result.count(Priority::Low), 3);
    assert_eq!(result.issues[2].title(), "Fallback source inspection unavailable");
}

#[tokio::test]
async fn test_script_heavy_page_through_real_collectors() {
    let mut page = String::from("<html><head>");
    for i in 0..40 {
        let hint = if i < 3 { "" } else { " async" };
        let _ = write!(page, r#"<script src="/js/{i}.js"{hint}></script>"#);
    }
    page.push_str("</head><body>");
    for i in 0..500 {
        let _ = write!(page, r#"<img src="/img/{i}.png">"#);
    }
    page.push_str("</body></html>");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/psi"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "The caller does not have permission" }
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let endpoint = Url::parse(&format!("{}/psi", server.uri())).unwrap();
    let primaries: Vec<_> = pagespeed::Strategy::ALL
        .into_iter()
        .map(|s| pagespeed::Provider::new(client.clone(), endpoint.clone(), s, None))
        .collect();
    let fallback = inspection::Provider::new(client, inspection::DEFAULT_USER_AGENT);
    let target = AuditTarget::new(Url::parse(&format!("{}/", server.uri())).unwrap(), Duration::from_secs(5));

    let outcome = FallbackCoordinator::new(&primaries, &fallback).run(&target, &NoProgress).await;
    let result = aggregate(&outcome, false);

    assert_eq!(result.score, Some(50.0));
    assert_eq!(result.score_source, ScoreSource::Estimated);
    assert_eq!(result.note, FALLBACK_NOTICE);
    assert_eq!(result.count(Priority::Low), 0);

    let titles: Vec<_> = result.issues.iter().map(|i| i.title()).collect();
    assert_eq!(
        titles,
        [
            "Render-blocking script risk detected",
            "High JavaScript request volume detected",
            "Images missing explicit dimensions",
        ]
    );
    assert!(result.issues.iter().all(|i| i.priority() == Priority::High));
}
