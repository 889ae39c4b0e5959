#![allow(clippy::unwrap_used)]
// Refresh scheduler and chart orchestrator against a wiremock backend.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jarm_api::ApiClient;
use jarm_core::{
    ChartData, ChartKind, ChartOrchestrator, FetchParams, RefreshIntervals, RefreshScheduler,
    StreamKind, StreamPayload, Update,
};

fn client(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    ))
}

async fn mount_streams(server: &MockServer) {
    let ok = |body| ResponseTemplate::new(200).set_body_json(body);
    for (route, body) in [
        ("/api/status", json!({ "system_running": false })),
        ("/api/metrics", json!({ "success": true, "metrics": {} })),
        ("/api/alerts", json!({ "success": true, "alerts": [] })),
        ("/api/notifications", json!({ "success": true, "notifications": [] })),
        ("/api/analytics", json!({ "success": true })),
        ("/api/processes", json!({ "success": true, "processes": [] })),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ok(body))
            .mount(server)
            .await;
    }
}

async fn collect_kinds(
    rx: &mut mpsc::UnboundedReceiver<Update>,
    want: usize,
) -> HashSet<StreamKind> {
    let mut seen = HashSet::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while seen.len() < want {
            if let Some(Update::Stream(update)) = rx.recv().await {
                assert_eq!(update.kind, update.payload.kind());
                seen.insert(update.kind);
            }
        }
    })
    .await
    .expect("streams did not report in time");
    seen
}

#[tokio::test]
async fn every_stream_polls_independently() {
    let server = MockServer::start().await;
    mount_streams(&server).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut scheduler = RefreshScheduler::new(
        client(&server),
        RefreshIntervals::uniform(Duration::from_millis(40)),
        FetchParams::default(),
        tx,
    );
    scheduler.start();
    assert!(scheduler.is_running());

    let seen = collect_kinds(&mut rx, 6).await;
    assert_eq!(seen.len(), 6);

    scheduler.stop();
    assert!(!scheduler.is_running());
}

#[tokio::test]
async fn failing_stream_does_not_block_the_others() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "database locked"
        })))
        .mount(&server)
        .await;
    mount_streams(&server).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut scheduler = RefreshScheduler::new(
        client(&server),
        RefreshIntervals::uniform(Duration::from_millis(40)),
        FetchParams::default(),
        tx,
    );
    scheduler.start();

    let seen = collect_kinds(&mut rx, 5).await;
    assert!(!seen.contains(&StreamKind::Alerts));
    scheduler.stop();
}

#[tokio::test]
async fn start_is_idempotent_and_stop_is_always_safe() {
    let server = MockServer::start().await;
    mount_streams(&server).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut scheduler = RefreshScheduler::new(
        client(&server),
        RefreshIntervals::uniform(Duration::from_secs(3600)),
        FetchParams::default(),
        tx,
    );
    scheduler.stop();

    scheduler.start();
    scheduler.start();
    // One immediate tick per stream per start; never more than twelve.
    collect_kinds(&mut rx, 6).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    let mut extra = 0;
    while rx.try_recv().is_ok() {
        extra += 1;
    }
    assert!(extra <= 6, "unexpected extra updates: {extra}");

    scheduler.stop();
    scheduler.stop();
}

#[tokio::test]
async fn set_period_restarts_only_when_running() {
    let server = MockServer::start().await;
    mount_streams(&server).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut scheduler = RefreshScheduler::new(
        client(&server),
        RefreshIntervals::uniform(Duration::from_secs(3600)),
        FetchParams::default(),
        tx,
    );

    scheduler.set_period(StreamKind::Status, Duration::from_millis(30));
    assert!(!scheduler.is_running());
    assert_eq!(
        scheduler.intervals().get(StreamKind::Status),
        Duration::from_millis(30)
    );

    scheduler.start();
    // The fast stream keeps reporting long after the slow ones went quiet.
    let mut status_updates = 0;
    tokio::time::timeout(Duration::from_secs(5), async {
        while status_updates < 4 {
            if let Some(Update::Stream(update)) = rx.recv().await {
                if update.kind == StreamKind::Status {
                    status_updates += 1;
                }
            }
        }
    })
    .await
    .unwrap();
    scheduler.stop();
}

#[tokio::test]
async fn metrics_stream_requests_configured_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metrics"))
        .and(query_param("hours", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "metrics": { "cpu_stats": { "current": 33.0 }, "active_processes": 210 }
        })))
        .mount(&server)
        .await;

    let params = FetchParams {
        metrics_hours: 6,
        ..FetchParams::default()
    };
    let payload = jarm_core::scheduler::fetch_stream(&client(&server), StreamKind::Metrics, &params)
        .await
        .unwrap();
    let StreamPayload::Metrics(sample) = payload else {
        panic!("expected metrics payload");
    };
    assert_eq!(sample.active_processes, 210);
}

// ── Charts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn selecting_a_chart_fetches_only_that_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/gauge-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "cpu": { "value": 91.0, "max": 100 },
            "memory": { "value": 55.0, "max": 100 },
            "processes": { "value": 120, "max": 500 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut charts = ChartOrchestrator::new(client(&server), Duration::from_secs(3600), 15, 24, tx);
    assert!(charts.visible(ChartKind::Bar));

    charts.select(ChartKind::Gauge);
    assert!(charts.visible(ChartKind::Gauge));
    assert!(!charts.visible(ChartKind::Bar));

    let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let Update::Chart(chart) = update else {
        panic!("expected chart update");
    };
    let ChartData::Gauge(gauge) = chart.data else {
        panic!("expected gauge data");
    };
    assert_eq!(gauge.cpu.color, "#dc2626");
    assert_eq!(gauge.memory.color, "#f59e0b");
    assert_eq!(gauge.processes.color, "#10b981");
}

#[tokio::test]
async fn history_window_change_requeries_line_chart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metrics/historical"))
        .and(query_param("hours", "168"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "timestamp": "2026-02-10T12:00:00", "cpu": 10.0, "memory": 20.0, "processes": 200 }],
            "count": 1,
            "time_range_hours": 168
        })))
        .mount(&server)
        .await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut charts = ChartOrchestrator::new(client(&server), Duration::from_secs(3600), 15, 24, tx);
    // Not the active chart yet: nothing is fetched.
    assert_eq!(charts.set_history_window(500), 168);
    assert!(rx.try_recv().is_err());

    charts.select(ChartKind::Line);
    let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let Update::Chart(chart) = update else {
        panic!("expected chart update");
    };
    let ChartData::Line(line) = chart.data else {
        panic!("expected line data");
    };
    assert_eq!(line.hours, 168);
    assert_eq!(line.points.len(), 1);
    assert_eq!(line.points[0].processes, 200);
}

#[tokio::test]
async fn auto_refresh_toggle_controls_timer() {
    let server = MockServer::start().await;
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut charts = ChartOrchestrator::new(client(&server), Duration::from_millis(50), 15, 24, tx);

    charts.start();
    assert!(charts.is_timer_running());
    assert!(!charts.toggle_auto_refresh());
    assert!(!charts.is_timer_running());
    assert!(charts.toggle_auto_refresh());
    assert!(charts.is_timer_running());
    charts.stop();
}
