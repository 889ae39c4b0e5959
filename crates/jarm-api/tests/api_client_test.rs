#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jarm_api::models::NewTask;
use jarm_api::{ApiClient, Error, TlsMode, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Status & monitoring ─────────────────────────────────────────────

#[tokio::test]
async fn test_status_without_success_flag() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "system_running": true,
            "timestamp": "2026-02-10T12:00:00+00:00",
            "agents": { "task_manager": "active", "system_monitor": "active" }
        })))
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();
    assert!(status.system_running);
    assert_eq!(status.agents.get("system_monitor").map(String::as_str), Some("active"));
}

#[tokio::test]
async fn test_start_monitoring_sends_interval() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/start_monitoring"))
        .and(body_json(json!({ "interval": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Real-time monitoring started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = client.start_monitoring(Some(5)).await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Real-time monitoring started"));
}

#[tokio::test]
async fn test_start_monitoring_already_running() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/start_monitoring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Monitoring already running"
        })))
        .mount(&server)
        .await;

    let result = client.start_monitoring(None).await;
    assert!(
        matches!(&result, Err(Error::Rejected { status: 200, message }) if message == "Monitoring already running"),
        "expected Rejected, got: {result:?}"
    );
}

#[tokio::test]
async fn test_stop_monitoring() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/stop_monitoring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Real-time monitoring stopped"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.stop_monitoring().await.unwrap();
}

#[tokio::test]
async fn test_healthz() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "status": "healthy",
            "system_running": false,
            "uptime_seconds": 12.5,
            "timestamp": "2026-02-10T12:00:00+00:00"
        })))
        .mount(&server)
        .await;

    let health = client.healthz().await.unwrap();
    assert!(health.ok);
    assert_eq!(health.status, "healthy");
    assert!((health.uptime_seconds - 12.5).abs() < f64::EPSILON);
}

// ── Metrics ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_metrics() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metrics"))
        .and(query_param("hours", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "metrics": {
                "cpu_stats": { "current": 42.5, "average": 42.5, "peak": 42.5 },
                "memory_stats": { "current": 61.0, "average": 61.0, "peak": 61.0 },
                "data_points": 1,
                "last_timestamp": "2026-02-10T12:00:00",
                "active_processes": 318,
                "historical": []
            }
        })))
        .mount(&server)
        .await;

    let resp = client.metrics(24).await.unwrap();
    assert!((resp.metrics.cpu_stats.current - 42.5).abs() < f64::EPSILON);
    assert_eq!(resp.metrics.active_processes, 318);
    assert_eq!(resp.metrics.data_points, 1);
}

#[tokio::test]
async fn test_metrics_failure_with_200_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "collector unavailable"
        })))
        .mount(&server)
        .await;

    let err = client.metrics(24).await.unwrap_err();
    assert_eq!(err.rejection_message(), Some("collector unavailable"));
}

#[tokio::test]
async fn test_historical_metrics() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metrics/historical"))
        .and(query_param("hours", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "timestamp": "2026-02-10T10:00:00", "cpu": 10.0, "memory": 50.0, "processes": 300 },
                { "timestamp": "2026-02-10T11:00:00", "cpu": 20.0, "memory": 55.0, "processes": 310 }
            ],
            "count": 2,
            "time_range_hours": 6
        })))
        .mount(&server)
        .await;

    let resp = client.historical_metrics(6).await.unwrap();
    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.time_range_hours, 6);
    assert_eq!(resp.data[1].processes, 310);
}

#[tokio::test]
async fn test_gauge_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system/gauge-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "cpu": { "value": 91.0, "max": 100, "color": "#dc2626" },
            "memory": { "value": 40.0, "max": 100, "color": "#10b981" },
            "processes": { "value": 520, "max": 624.0, "color": "#dc2626" },
            "timestamp": "2026-02-10T12:00:00"
        })))
        .mount(&server)
        .await;

    let gauge = client.gauge_data().await.unwrap();
    assert!((gauge.processes.max - 624.0).abs() < f64::EPSILON);
    assert_eq!(gauge.cpu.color.as_deref(), Some("#dc2626"));
}

#[tokio::test]
async fn test_export_metrics_returns_sql_text() {
    let (server, client) = setup().await;

    let sql = "-- JARM Metrics MySQL export\nCREATE TABLE IF NOT EXISTS system_metrics (id INT);\n";
    Mock::given(method("GET"))
        .and(path("/api/export_metrics_mysql"))
        .and(query_param("hours", "48"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/sql")
                .set_body_string(sql),
        )
        .mount(&server)
        .await;

    let body = client.export_metrics_sql(48).await.unwrap();
    assert!(body.starts_with("-- JARM Metrics MySQL export"));
}

#[tokio::test]
async fn test_export_metrics_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/export_metrics_mysql"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "database locked"
        })))
        .mount(&server)
        .await;

    let err = client.export_metrics_sql(24).await.unwrap_err();
    assert!(matches!(err, Error::Rejected { status: 400, .. }));
    assert_eq!(err.rejection_message(), Some("database locked"));
}

// ── Alerts & notifications ──────────────────────────────────────────

#[tokio::test]
async fn test_alerts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "alerts": [{
                "id": 17,
                "type": "high_cpu",
                "severity": "Critical",
                "message": "CPU above 95%",
                "source": "system_monitor",
                "created_at": "2026-02-10T12:00:00"
            }]
        })))
        .mount(&server)
        .await;

    let resp = client.alerts().await.unwrap();
    assert_eq!(resp.alerts.len(), 1);
    let alert = &resp.alerts[0];
    assert_eq!(alert.id.as_deref(), Some("17"));
    assert_eq!(alert.alert_type.as_deref(), Some("high_cpu"));
    assert_eq!(alert.severity.as_deref(), Some("Critical"));
}

#[tokio::test]
async fn test_notifications() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "notifications": [
                { "id": 42, "severity": "High", "category": "security", "message": "Port scan", "timestamp": "2026-02-10T12:00:00", "isRead": false },
                { "id": 41, "severity": "Low", "category": "system", "message": "Disk ok", "timestamp": "2026-02-10T11:00:00", "isRead": true }
            ]
        })))
        .mount(&server)
        .await;

    let resp = client.notifications().await.unwrap();
    assert_eq!(resp.notifications.len(), 2);
    assert!(!resp.notifications[0].is_read);
    assert!(resp.notifications[1].is_read);
}

#[tokio::test]
async fn test_mark_notification_read() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/notifications/42/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Notification marked as read"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.mark_notification_read("42").await.unwrap();
}

#[tokio::test]
async fn test_mark_notification_read_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/notifications/999/read"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Notification not found"
        })))
        .mount(&server)
        .await;

    let err = client.mark_notification_read("999").await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

#[tokio::test]
async fn test_mark_notification_read_encodes_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/notifications/..%2Fstop_monitoring%3F/read"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Notification not found"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/stop_monitoring"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .mark_notification_read("../stop_monitoring?")
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

#[tokio::test]
async fn test_mark_notification_read_refuses_dot_segments() {
    let (server, client) = setup().await;

    for id in ["..", ".", ""] {
        let err = client.mark_notification_read(id).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPathSegment(_)), "got: {err:?}");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_all_read() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/notifications/mark_all_read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "All notifications marked as read"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.mark_all_notifications_read().await.unwrap();
}

// ── Processes ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_processes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/processes"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "processes": [
                { "pid": 1, "name": "systemd", "user": "root", "cpu_percent": 0.1, "memory_percent": 0.4, "read_bytes": 0, "write_bytes": 0 },
                { "pid": 812, "name": "postgres", "user": null, "cpu_percent": 3.2, "memory_percent": 6.5, "read_bytes": 1024, "write_bytes": 2048 }
            ],
            "limit": 10
        })))
        .mount(&server)
        .await;

    let resp = client.processes(10).await.unwrap();
    assert_eq!(resp.processes.len(), 2);
    assert_eq!(resp.processes[1].name, "postgres");
    assert!(resp.processes[1].user.is_none());
    assert_eq!(resp.limit, Some(10));
}

#[tokio::test]
async fn test_process_chart_data() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/processes/chart-data"))
        .and(query_param("limit", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "processes": [],
            "bar_chart": {
                "labels": ["firefox", "a-very-long-pro..."],
                "memory_data": [8.5, 2.0],
                "cpu_data": [12.0, 0.5]
            },
            "pie_chart": {
                "memory_distribution": {
                    "labels": ["High Memory (>5%)", "Medium Memory (1-5%)", "Low Memory (<1%)"],
                    "data": [1, 1, 0],
                    "colors": ["#ef4444", "#f59e0b", "#10b981"]
                },
                "cpu_distribution": {
                    "labels": ["High CPU (>10%)", "Medium CPU (1-10%)", "Low CPU (<1%)"],
                    "data": [1, 0, 1],
                    "colors": ["#dc2626", "#ea580c", "#059669"]
                }
            },
            "timestamp": "2026-02-10T12:00:00"
        })))
        .mount(&server)
        .await;

    let chart = client.process_chart_data(15).await.unwrap();
    assert_eq!(chart.bar_chart.labels.len(), 2);
    assert_eq!(chart.pie_chart.cpu_distribution.data, vec![1, 0, 1]);
}

#[tokio::test]
async fn test_application_history() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/application_history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "sessions": [{
                "session_id": "s-1",
                "start_time": "2026-02-10T09:00:00",
                "applications": [
                    { "id": 3, "name": "code", "pid": 4242, "cpu_usage": 4.0, "memory_usage": 9.5, "start_time": "2026-02-10T09:01:00" }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let history = client.application_history().await.unwrap();
    assert_eq!(history.sessions.len(), 1);
    assert_eq!(history.sessions[0].applications[0].pid, Some(4242));
}

// ── Tasks & analytics ───────────────────────────────────────────────

#[tokio::test]
async fn test_list_tasks() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": [{
                "id": 9,
                "name": "backup",
                "description": "nightly backup",
                "command": "tar czf /tmp/b.tgz /srv",
                "category": "file_operation",
                "risk_score": 0.35,
                "status": "pending",
                "created_at": null
            }]
        })))
        .mount(&server)
        .await;

    let resp = client.list_tasks(50).await.unwrap();
    assert_eq!(resp.tasks[0].id.as_deref(), Some("9"));
    assert_eq!(resp.tasks[0].category.as_deref(), Some("file_operation"));
    assert!(resp.tasks[0].created_at.is_none());
}

#[tokio::test]
async fn test_create_task() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(json!({
            "name": "cleanup",
            "description": "remove temp files",
            "command": "rm -rf /tmp/scratch"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "task": { "id": 10, "name": "cleanup", "risk_score": 0.8, "status": "pending" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = NewTask {
        name: "cleanup".into(),
        description: "remove temp files".into(),
        command: "rm -rf /tmp/scratch".into(),
    };
    let created = client.create_task(&task).await.unwrap();
    assert_eq!(created.task.name, "cleanup");
    assert_eq!(created.task.risk_score, Some(0.8));
}

#[tokio::test]
async fn test_create_task_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "Task name is required"
        })))
        .mount(&server)
        .await;

    let result = client.create_task(&NewTask::default()).await;
    assert!(
        matches!(&result, Err(Error::Rejected { status: 400, message }) if message == "Task name is required"),
        "expected Rejected, got: {result:?}"
    );
}

#[tokio::test]
async fn test_analytics() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/analytics"))
        .and(query_param("days", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": {
                "category_distribution": { "system_maintenance": 4, "file_operation": 2 },
                "risk_statistics": { "average": 0.4, "minimum": 0.1, "maximum": 0.9 },
                "success_rates": { "system_maintenance": 0.75 },
                "total_tasks": 6,
                "period_days": 30
            },
            "alerts": {
                "severity_distribution": { "High": 2 },
                "type_distribution": { "high_cpu": 2 },
                "total_alerts": 2,
                "period_days": 30
            },
            "learning": { "total_states": 12, "total_visits": 40, "recent_activity": 3 }
        })))
        .mount(&server)
        .await;

    let analytics = client.analytics(30).await.unwrap();
    assert_eq!(analytics.tasks.total_tasks, 6);
    assert_eq!(analytics.tasks.category_distribution.get("file_operation"), Some(&2));
    assert_eq!(analytics.alerts.total_alerts, 2);
    assert_eq!(analytics.learning.total_visits, 40);
}

// ── Transport errors ────────────────────────────────────────────────

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Port 9 (discard) on localhost is almost never listening.
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
    );

    let err = client.status().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_slow_backend_reports_timeout() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: Duration::from_millis(200),
    };
    let client = ApiClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "system_running": true }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.status().await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { timeout } if timeout == Duration::from_millis(200)),
        "got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_server_error_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.alerts().await.unwrap_err();
    assert!(matches!(err, Error::Rejected { status: 503, .. }), "got: {err:?}");
}

// ── Readiness, diagnostics & statistics ─────────────────────────────

#[tokio::test]
async fn test_readyz_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/readyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "checks": { "database": { "ok": true }, "app_history_db": { "ok": true } },
            "timestamp": "2026-02-10T12:00:00+00:00"
        })))
        .mount(&server)
        .await;

    let ready = client.readyz().await.unwrap();
    assert!(ready.ok);
    assert_eq!(ready.checks.len(), 2);
}

#[tokio::test]
async fn test_readyz_unavailable_still_decodes_checks() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/readyz"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "ok": false,
            "checks": {
                "database": { "ok": false, "error": "database is locked" },
                "app_history_db": { "ok": true }
            },
            "timestamp": "2026-02-10T12:00:00+00:00"
        })))
        .mount(&server)
        .await;

    let ready = client.readyz().await.unwrap();
    assert!(!ready.ok);
    assert_eq!(
        ready.checks["database"].error.as_deref(),
        Some("database is locked")
    );
}

#[tokio::test]
async fn test_readyz_other_failures_are_errors() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/readyz"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.readyz().await.unwrap_err();
    assert!(err.is_transient(), "expected transient, got: {err:?}");
}

#[tokio::test]
async fn test_diagnostics() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/diagnostics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "diagnostics": {
                "system": { "system_running": true, "data_points": 120, "monitor_thread_alive": true },
                "config": { "debug": false, "cpu_threshold": 80, "memory_threshold": 85 },
                "time": { "now": "2026-02-10T12:00:00+00:00", "uptime_seconds": 7200 },
                "database": { "ok": true, "counts": { "tasks": 3, "alerts": 1, "metrics": 120 } },
                "app_history_db": { "ok": true, "counts": { "application_history": 9 } },
                "versions": { "flask": "3.0.0", "psutil": "5.9.8" }
            }
        })))
        .mount(&server)
        .await;

    let d = client.diagnostics().await.unwrap().diagnostics;
    assert!(d.system.monitor_thread_alive);
    assert_eq!(d.time.uptime_seconds, 7200);
    assert_eq!(d.database.counts["metrics"], 120);
    assert_eq!(d.versions["flask"], "3.0.0");
}

#[tokio::test]
async fn test_learning_and_security_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/learning/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "learning": {
                "total_states": 4,
                "total_visits": 31,
                "recent_activity": 6,
                "top_states": [{ "state": "browser_high_cpu", "visits": 12 }]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/security/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "security": { "total_alerts": 17, "recent_alerts": 2 }
        })))
        .mount(&server)
        .await;

    let learning = client.learning_stats().await.unwrap().learning;
    assert_eq!(learning.total_visits, 31);
    assert_eq!(learning.top_states.len(), 1);

    let security = client.security_stats().await.unwrap().security;
    assert_eq!(security.total_alerts, 17);
    assert_eq!(security.recent_alerts, 2);
}

#[tokio::test]
async fn test_task_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/task/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": { "work": 5, "entertainment": 2 }
        })))
        .mount(&server)
        .await;

    let stats = client.task_stats().await.unwrap();
    assert_eq!(stats.tasks["work"], 5);
    assert_eq!(stats.tasks.values().sum::<u64>(), 7);
}

// ── Decisions, process files & CSV exports ──────────────────────────

#[tokio::test]
async fn test_task_decision() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/decisions/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "decision": {
                "task_id": 12,
                "category": "entertainment",
                "action": "WARN",
                "message": "Entertainment during work hours",
                "timestamp": "Tue, 10 Feb 2026 12:00:00 GMT"
            }
        })))
        .mount(&server)
        .await;

    let decision = client.task_decision(12).await.unwrap().decision;
    assert_eq!(decision.task_id.as_deref(), Some("12"));
    assert_eq!(decision.action.as_deref(), Some("WARN"));
}

#[tokio::test]
async fn test_task_decision_missing_task() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/decisions/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Task not found"
        })))
        .mount(&server)
        .await;

    let err = client.task_decision(404).await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
    assert_eq!(err.rejection_message(), Some("Task not found"));
}

#[tokio::test]
async fn test_explain_task_decision() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/learning/explain/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "explanation": "Seen 9 times; usually allowed",
            "confidence": 0.82,
            "action": "ALLOW"
        })))
        .mount(&server)
        .await;

    let explained = client.explain_task_decision(7).await.unwrap();
    assert_eq!(explained.action.as_deref(), Some("ALLOW"));
    assert!((explained.confidence - 0.82).abs() < 1e-9);
}

#[tokio::test]
async fn test_process_files_with_limit() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/processes/4321/files"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "pid": 4321,
            "files": ["/var/log/app.log", "/tmp/cache.db"],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let files = client.process_files(4321, Some(2)).await.unwrap();
    assert_eq!(files.pid, 4321);
    assert_eq!(files.files, ["/var/log/app.log", "/tmp/cache.db"]);
}

#[tokio::test]
async fn test_process_files_missing_process() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/processes/1/files"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Process not found"
        })))
        .mount(&server)
        .await;

    let err = client.process_files(1, None).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_csv_exports() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/export_tasks_csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("id,name,category\n1,Write report,work\n"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/export_alerts_csv"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "no such table: alerts"
        })))
        .mount(&server)
        .await;

    let tasks = client.export_tasks_csv().await.unwrap();
    assert!(tasks.starts_with("id,name,category\n"));

    let err = client.export_alerts_csv().await.unwrap_err();
    assert_eq!(err.rejection_message(), Some("no such table: alerts"));
}
