//! Scheduler, shutdown and admin API behavior.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use uptime_monitor::admin::handlers::{EndpointStatus, SystemStatus};
use uptime_monitor::admin::{setup_admin_router, AdminState};
use uptime_monitor::aggregate::{AggregateSnapshot, Aggregator, Counters};
use uptime_monitor::config::{EndpointConfig, MonitorConfig};
use uptime_monitor::lifecycle::{Services, Shutdown};
use uptime_monitor::probe::{ProbeExecutor, ProbePolicy, TerminalOutcome};
use uptime_monitor::registry::{Endpoint, Registry};
use uptime_monitor::session::{Monitor, SessionRunner};
use uptime_monitor::sink::DiscardSink;

mod common;
use common::{refused, ScriptedTransport};

fn runner(transport: Arc<ScriptedTransport>, urls: &[&str]) -> Arc<SessionRunner> {
    let registry = Arc::new(
        Registry::new(urls.iter().map(|u| Endpoint::new(*u, 200)).collect()).unwrap(),
    );
    let policy = ProbePolicy::new(1, Duration::from_secs(1), Duration::ZERO).unwrap();
    let sink = Arc::new(DiscardSink);
    let executor = Arc::new(ProbeExecutor::new(transport, sink.clone(), policy));
    Arc::new(SessionRunner::new(registry, executor, Arc::new(Aggregator::new()), sink))
}

#[tokio::test]
async fn test_monitor_stops_after_max_cycles() {
    let transport = Arc::new(ScriptedTransport::new().with("https://a.test", vec![Ok(200)]));
    let runner = runner(transport.clone(), &["https://a.test"]);
    let monitor = Monitor::with_interval(runner.clone(), Duration::from_millis(10), Some(3));
    let latest = monitor.latest();
    let shutdown = Shutdown::new();

    let completed = monitor.run(shutdown.subscribe()).await;

    assert_eq!(completed, 3);
    assert_eq!(transport.total_calls(), 3);
    assert_eq!(latest.load_full().unwrap().cycle, 3);
    assert_eq!(
        runner.aggregator().snapshot().get("https://a.test"),
        Some(&Counters::new(3, 0, 0))
    );
}

#[tokio::test]
async fn test_shutdown_mid_cycle_finishes_the_cycle() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with("https://a.test", vec![Ok(200)])
            .with("https://b.test", vec![Ok(503)])
            .with_latency(Duration::from_millis(100)),
    );
    let runner = runner(transport, &["https://a.test", "https://b.test"]);
    let monitor = Monitor::with_interval(runner.clone(), Duration::from_secs(3600), None);
    let shutdown = Arc::new(Shutdown::new());
    let rx = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        trigger.trigger();
    });

    let completed = tokio::time::timeout(Duration::from_secs(5), monitor.run(rx))
        .await
        .expect("monitor should stop after the in-flight cycle");

    assert_eq!(completed, 1);
    let snapshot = runner.aggregator().snapshot();
    assert_eq!(snapshot.totals(), Counters::new(1, 1, 0), "No partial cycle");
}

#[tokio::test]
async fn test_shutdown_before_start_runs_nothing() {
    let transport = Arc::new(ScriptedTransport::new().with("https://a.test", vec![Ok(200)]));
    let runner = runner(transport.clone(), &["https://a.test"]);
    let monitor = Monitor::with_interval(runner, Duration::from_millis(10), None);
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    shutdown.trigger();

    assert_eq!(monitor.run(rx).await, 0);
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn test_services_run_with_cycle_limit() {
    let mut config = MonitorConfig::default();
    config.endpoints = vec![
        EndpointConfig {
            url: "https://a.test".into(),
            expected_status: 200,
        },
        EndpointConfig {
            url: "https://b.test".into(),
            expected_status: 200,
        },
    ];
    config.probe.retry_delay_ms = 1;
    config.schedule.interval_secs = 1;
    config.schedule.max_cycles = 2;
    config.event_log.enabled = false;

    let transport = Arc::new(
        ScriptedTransport::new()
            .with("https://a.test", vec![Ok(200)])
            .with("https://b.test", vec![refused()]),
    );
    let services = Services::build_with_transport(config, transport).await.unwrap();
    let aggregator = services.aggregator.clone();

    let completed = services.run(Arc::new(Shutdown::new())).await.unwrap();

    assert_eq!(completed, 2);
    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.get("https://a.test"), Some(&Counters::new(2, 0, 0)));
    assert_eq!(snapshot.get("https://b.test"), Some(&Counters::new(0, 0, 2)));
}

#[tokio::test]
async fn test_services_honor_shutdown_before_run() {
    let mut config = MonitorConfig::default();
    config.endpoints = vec![EndpointConfig {
        url: "https://a.test".into(),
        expected_status: 200,
    }];
    config.schedule.max_cycles = 1;
    config.event_log.enabled = false;
    config.admin.enabled = true;
    config.admin.bind_address = "127.0.0.1:0".into();

    let transport = Arc::new(ScriptedTransport::new().with("https://a.test", vec![Ok(200)]));
    let services = Services::build_with_transport(config, transport.clone())
        .await
        .unwrap();

    let shutdown = Arc::new(Shutdown::new());
    shutdown.trigger();

    let completed = tokio::time::timeout(Duration::from_secs(3), services.run(shutdown))
        .await
        .expect("run should return when shutdown was requested before it started")
        .unwrap();

    assert_eq!(completed, 0);
    assert_eq!(transport.total_calls(), 0);
}

#[tokio::test]
async fn test_services_reject_empty_registry() {
    let transport = Arc::new(ScriptedTransport::new());
    let result = Services::build_with_transport(MonitorConfig::default(), transport).await;
    assert!(result.is_err());
}

async fn get_json<T: serde::de::DeserializeOwned>(
    router: &axum::Router,
    uri: &str,
) -> (StatusCode, Option<T>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

#[tokio::test]
async fn test_admin_api_reports_counters_and_latest_cycle() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with("https://a.test", vec![Ok(200)])
            .with("https://b.test", vec![Ok(500)]),
    );
    let runner = runner(transport, &["https://a.test", "https://b.test"]);
    let monitor = Monitor::with_interval(runner.clone(), Duration::from_millis(10), Some(1));
    let router = setup_admin_router(AdminState {
        registry: runner.registry().clone(),
        aggregator: runner.aggregator().clone(),
        latest: monitor.latest(),
        session_id: runner.session_id(),
    });

    let (status, _) = get_json::<serde_json::Value>(&router, "/admin/cycles/latest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let shutdown = Shutdown::new();
    monitor.run(shutdown.subscribe()).await;

    let (status, body) = get_json::<SystemStatus>(&router, "/admin/status").await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body.endpoints, 2);
    assert_eq!(body.cycles_completed, 1);
    assert_eq!(body.session_id, runner.session_id());

    let (_, counters) = get_json::<AggregateSnapshot>(&router, "/admin/counters").await;
    let counters = counters.unwrap();
    assert_eq!(counters.get("https://a.test"), Some(&Counters::new(1, 0, 0)));
    assert_eq!(counters.get("https://b.test"), Some(&Counters::new(0, 1, 0)));

    let (_, endpoints) = get_json::<Vec<EndpointStatus>>(&router, "/admin/endpoints").await;
    let endpoints = endpoints.unwrap();
    assert_eq!(endpoints[0].url, "https://a.test");
    assert_eq!(endpoints[1].last_outcome, Some(TerminalOutcome::Down));
    assert_eq!(endpoints[1].last_status, Some(500));

    let (status, latest) = get_json::<serde_json::Value>(&router, "/admin/cycles/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest.unwrap()["cycle"], 1);
}
