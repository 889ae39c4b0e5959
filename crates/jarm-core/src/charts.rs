// ── Visualization refresh orchestrator ──
//
// Four chart kinds share one active slot. Only the active kind is ever
// fetched, either on demand or from the orchestrator's own timer, which
// runs independently of the refresh scheduler.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jarm_api::ApiClient;
use jarm_api::models::{Distribution, GaugeReading, GaugeResponse, ProcessChartResponse};

use crate::dashboard::Update;
use crate::error::CoreError;
use crate::model::{
    BarChartView, ChartData, ChartKind, Dial, GaugeView, HistoricalSample, LineChartView,
    PieChartView, ProcessSample, Severity, Slice,
};

pub const MIN_HISTORY_HOURS: u32 = 1;
pub const MAX_HISTORY_HOURS: u32 = 168;

const LABEL_MAX_CHARS: usize = 15;
const BAR_FALLBACK_TOP_N: usize = 10;

/// What the active chart currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSelection {
    pub kind: ChartKind,
    pub history_hours: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartUpdate {
    pub data: ChartData,
    pub received_at: DateTime<Utc>,
}

impl ChartUpdate {
    pub fn kind(&self) -> ChartKind {
        self.data.kind()
    }
}

// ── Mapping ──────────────────────────────────────────────────────────

/// Truncate to 15 characters plus `"..."`.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let head: String = label.chars().take(LABEL_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        label.to_owned()
    }
}

/// Which dial a gauge level is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialMetric {
    Percent,
    ProcessCount,
}

pub fn gauge_level(value: f64, metric: DialMetric) -> Severity {
    let (critical, high, medium) = match metric {
        DialMetric::Percent => (90.0, 70.0, 50.0),
        DialMetric::ProcessCount => (400.0, 250.0, 150.0),
    };
    if value >= critical {
        Severity::Critical
    } else if value >= high {
        Severity::High
    } else if value >= medium {
        Severity::Medium
    } else {
        Severity::Low
    }
}

pub fn level_color(level: Severity) -> &'static str {
    match level {
        Severity::Critical => "#dc2626",
        Severity::High => "#ea580c",
        Severity::Medium => "#f59e0b",
        Severity::Low => "#10b981",
    }
}

fn dial(reading: &GaugeReading, metric: DialMetric) -> Dial {
    let level = gauge_level(reading.value, metric);
    let max = if reading.max > 0.0 {
        reading.max
    } else {
        match metric {
            DialMetric::Percent => 100.0,
            DialMetric::ProcessCount => (reading.value * 1.2).max(500.0),
        }
    };
    Dial {
        value: reading.value,
        max,
        level,
        color: reading
            .color
            .clone()
            .unwrap_or_else(|| level_color(level).to_owned()),
    }
}

pub fn gauge_view(response: &GaugeResponse) -> GaugeView {
    GaugeView {
        cpu: dial(&response.cpu, DialMetric::Percent),
        memory: dial(&response.memory, DialMetric::Percent),
        processes: dial(&response.processes, DialMetric::ProcessCount),
    }
}

/// Bar series from the backend's pre-built arrays, or from the raw
/// process list when those are missing.
pub fn bar_view(response: &ProcessChartResponse) -> BarChartView {
    let bar = &response.bar_chart;
    if !bar.labels.is_empty() {
        let len = bar.labels.len();
        let pad = |series: &[f64]| {
            let mut values: Vec<f64> = series.iter().copied().take(len).collect();
            values.resize(len, 0.0);
            values
        };
        return BarChartView {
            labels: bar.labels.iter().map(|l| truncate_label(l)).collect(),
            memory: pad(&bar.memory_data),
            cpu: pad(&bar.cpu_data),
        };
    }

    let mut top: Vec<ProcessSample> = response
        .processes
        .iter()
        .cloned()
        .map(ProcessSample::from)
        .collect();
    top.sort_by(|a, b| {
        b.memory_percent
            .partial_cmp(&a.memory_percent)
            .unwrap_or(Ordering::Equal)
    });
    top.truncate(BAR_FALLBACK_TOP_N);

    BarChartView {
        labels: top.iter().map(|p| truncate_label(&p.name)).collect(),
        memory: top.iter().map(|p| p.memory_percent).collect(),
        cpu: top.iter().map(|p| p.cpu_percent).collect(),
    }
}

fn slices(distribution: &Distribution) -> Vec<Slice> {
    distribution
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| Slice {
            label: label.clone(),
            count: distribution.data.get(i).copied().unwrap_or(0),
            color: distribution.colors.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}

fn bucket(
    values: impl Iterator<Item = f64> + Clone,
    high: f64,
    labels: [&str; 3],
    colors: [&str; 3],
) -> Vec<Slice> {
    let count = |pred: &dyn Fn(f64) -> bool| {
        let n = values.clone().filter(|v| pred(*v)).count();
        u64::try_from(n).unwrap_or(u64::MAX)
    };
    let counts = [
        count(&|v| v > high),
        count(&|v| v > 1.0 && v <= high),
        count(&|v| v <= 1.0),
    ];
    labels
        .iter()
        .zip(counts)
        .zip(colors)
        .map(|((label, count), color)| Slice {
            label: (*label).to_owned(),
            count,
            color: color.to_owned(),
        })
        .collect()
}

/// Memory and CPU share distributions. Buckets locally when the backend
/// omitted them.
pub fn pie_view(response: &ProcessChartResponse) -> PieChartView {
    let pie = &response.pie_chart;
    let memory = if pie.memory_distribution.labels.is_empty() {
        bucket(
            response.processes.iter().map(|p| p.memory_percent),
            5.0,
            ["High Memory (>5%)", "Medium Memory (1-5%)", "Low Memory (<1%)"],
            ["#ef4444", "#f59e0b", "#10b981"],
        )
    } else {
        slices(&pie.memory_distribution)
    };
    let cpu = if pie.cpu_distribution.labels.is_empty() {
        bucket(
            response.processes.iter().map(|p| p.cpu_percent),
            10.0,
            ["High CPU (>10%)", "Medium CPU (1-10%)", "Low CPU (<1%)"],
            ["#dc2626", "#ea580c", "#059669"],
        )
    } else {
        slices(&pie.cpu_distribution)
    };
    PieChartView { memory, cpu }
}

pub fn clamp_history_hours(hours: u32) -> u32 {
    hours.clamp(MIN_HISTORY_HOURS, MAX_HISTORY_HOURS)
}

/// Fetch and map one chart.
pub async fn fetch_chart(
    api: &ApiClient,
    selection: ChartSelection,
    process_limit: u32,
) -> Result<ChartData, CoreError> {
    let data = match selection.kind {
        ChartKind::Bar => ChartData::Bar(bar_view(&api.process_chart_data(process_limit).await?)),
        ChartKind::Pie => ChartData::Pie(pie_view(&api.process_chart_data(process_limit).await?)),
        ChartKind::Gauge => ChartData::Gauge(gauge_view(&api.gauge_data().await?)),
        ChartKind::Line => {
            let hours = clamp_history_hours(selection.history_hours);
            let response = api.historical_metrics(hours).await?;
            ChartData::Line(LineChartView {
                hours,
                points: response
                    .data
                    .into_iter()
                    .map(HistoricalSample::from)
                    .collect(),
            })
        }
    };
    Ok(data)
}

// ── ChartOrchestrator ────────────────────────────────────────────────

pub struct ChartOrchestrator {
    api: Arc<ApiClient>,
    selection: watch::Sender<ChartSelection>,
    period: Duration,
    process_limit: u32,
    auto_refresh: bool,
    tx: mpsc::UnboundedSender<Update>,
    timer: Option<CancellationToken>,
}

impl ChartOrchestrator {
    pub fn new(
        api: Arc<ApiClient>,
        period: Duration,
        process_limit: u32,
        history_hours: u32,
        tx: mpsc::UnboundedSender<Update>,
    ) -> Self {
        let (selection, _) = watch::channel(ChartSelection {
            kind: ChartKind::default(),
            history_hours: clamp_history_hours(history_hours),
        });
        Self {
            api,
            selection,
            period,
            process_limit,
            auto_refresh: true,
            tx,
            timer: None,
        }
    }

    pub fn selection(&self) -> ChartSelection {
        *self.selection.borrow()
    }

    pub fn active(&self) -> ChartKind {
        self.selection().kind
    }

    /// Only the active chart is shown.
    pub fn visible(&self, kind: ChartKind) -> bool {
        self.active() == kind
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn history_hours(&self) -> u32 {
        self.selection().history_hours
    }

    /// Switch the active chart and refresh it immediately.
    pub fn select(&mut self, kind: ChartKind) {
        self.selection.send_modify(|s| s.kind = kind);
        debug!(chart = %kind, "chart selected");
        self.refresh_now();
    }

    /// Set the line chart look-back window, clamped to 1..=168 hours.
    /// Re-queries when the line chart is active.
    pub fn set_history_window(&mut self, hours: u32) -> u32 {
        let hours = clamp_history_hours(hours);
        let changed = self.selection.send_if_modified(|s| {
            let changed = s.history_hours != hours;
            s.history_hours = hours;
            changed
        });
        if changed && self.active() == ChartKind::Line {
            self.refresh_now();
        }
        hours
    }

    /// Fetch the active chart once, in the background.
    pub fn refresh_now(&self) {
        let api = Arc::clone(&self.api);
        let selection = self.selection();
        let limit = self.process_limit;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            refresh_once(&api, selection, limit, &tx).await;
        });
    }

    /// Start the periodic timer if auto-refresh is on. Idempotent.
    pub fn start(&mut self) {
        if self.timer.is_some() || !self.auto_refresh {
            return;
        }
        let cancel = CancellationToken::new();
        tokio::spawn(chart_timer(
            Arc::clone(&self.api),
            self.selection.subscribe(),
            self.period,
            self.process_limit,
            self.tx.clone(),
            cancel.clone(),
        ));
        self.timer = Some(cancel);
        info!(period_ms = self.period.as_millis(), "chart auto-refresh on");
    }

    pub fn stop(&mut self) {
        if let Some(cancel) = self.timer.take() {
            cancel.cancel();
            info!("chart auto-refresh off");
        }
    }

    /// Flip auto-refresh. Returns the new state.
    pub fn toggle_auto_refresh(&mut self) -> bool {
        self.auto_refresh = !self.auto_refresh;
        if self.auto_refresh {
            self.start();
        } else {
            self.stop();
        }
        self.auto_refresh
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }
}

impl Drop for ChartOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn refresh_once(
    api: &ApiClient,
    selection: ChartSelection,
    limit: u32,
    tx: &mpsc::UnboundedSender<Update>,
) -> bool {
    match fetch_chart(api, selection, limit).await {
        Ok(data) => tx
            .send(Update::Chart(ChartUpdate {
                data,
                received_at: Utc::now(),
            }))
            .is_ok(),
        Err(e) => {
            warn!(chart = %selection.kind, error = %e, "chart refresh failed");
            true
        }
    }
}

async fn chart_timer(
    api: Arc<ApiClient>,
    selection: watch::Receiver<ChartSelection>,
    period: Duration,
    limit: u32,
    tx: mpsc::UnboundedSender<Update>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Selecting a chart already fetches it; skip the immediate tick.
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let current = *selection.borrow();
                if !refresh_once(&api, current, limit, &tx).await {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use jarm_api::models::{BarChartData, PieChartData, ProcessRecord};
    use pretty_assertions::assert_eq;

    use super::*;

    fn process(name: &str, cpu: f64, mem: f64) -> ProcessRecord {
        ProcessRecord {
            pid: 1,
            name: name.into(),
            cpu_percent: cpu,
            memory_percent: mem,
            ..ProcessRecord::default()
        }
    }

    #[test]
    fn labels_truncate_at_fifteen_chars() {
        assert_eq!(truncate_label("short"), "short");
        assert_eq!(truncate_label("exactly15chars!"), "exactly15chars!");
        assert_eq!(
            truncate_label("com.example.background-worker"),
            "com.example.bac..."
        );
        assert_eq!(truncate_label(&"ä".repeat(16)), "ä".repeat(15) + "...");
    }

    #[test]
    fn gauge_thresholds() {
        assert_eq!(gauge_level(95.0, DialMetric::Percent), Severity::Critical);
        assert_eq!(gauge_level(90.0, DialMetric::Percent), Severity::Critical);
        assert_eq!(gauge_level(70.0, DialMetric::Percent), Severity::High);
        assert_eq!(gauge_level(50.0, DialMetric::Percent), Severity::Medium);
        assert_eq!(gauge_level(49.9, DialMetric::Percent), Severity::Low);

        assert_eq!(gauge_level(400.0, DialMetric::ProcessCount), Severity::Critical);
        assert_eq!(gauge_level(300.0, DialMetric::ProcessCount), Severity::High);
        assert_eq!(gauge_level(150.0, DialMetric::ProcessCount), Severity::Medium);
        assert_eq!(gauge_level(90.0, DialMetric::ProcessCount), Severity::Low);
    }

    #[test]
    fn gauge_fills_missing_max_and_color() {
        let response = GaugeResponse {
            cpu: GaugeReading {
                value: 72.0,
                max: 0.0,
                color: None,
            },
            processes: GaugeReading {
                value: 600.0,
                max: 0.0,
                color: Some("#123456".into()),
            },
            ..GaugeResponse::default()
        };
        let view = gauge_view(&response);
        assert_eq!(view.cpu.max, 100.0);
        assert_eq!(view.cpu.level, Severity::High);
        assert_eq!(view.cpu.color, "#ea580c");
        assert_eq!(view.processes.max, 720.0);
        assert_eq!(view.processes.color, "#123456");
        assert_eq!(view.memory.color, "#10b981");
    }

    #[test]
    fn bar_uses_backend_series_when_present() {
        let response = ProcessChartResponse {
            bar_chart: BarChartData {
                labels: vec!["postgres".into(), "a-very-long-process-name".into()],
                memory_data: vec![12.5, 3.0],
                cpu_data: vec![4.0],
            },
            ..ProcessChartResponse::default()
        };
        let view = bar_view(&response);
        assert_eq!(view.labels, vec!["postgres", "a-very-long-pro..."]);
        assert_eq!(view.memory, vec![12.5, 3.0]);
        assert_eq!(view.cpu, vec![4.0, 0.0]);
    }

    #[test]
    fn bar_falls_back_to_top_processes_by_memory() {
        let processes = (0..12)
            .map(|i| process(&format!("p{i}"), f64::from(i), f64::from(i) * 2.0))
            .collect();
        let response = ProcessChartResponse {
            processes,
            ..ProcessChartResponse::default()
        };
        let view = bar_view(&response);
        assert_eq!(view.labels.len(), 10);
        assert_eq!(view.labels[0], "p11");
        assert_eq!(view.memory[0], 22.0);
        assert_eq!(view.cpu[0], 11.0);
        assert_eq!(view.labels.len(), view.cpu.len());
    }

    #[test]
    fn pie_buckets_when_backend_omits_distributions() {
        let response = ProcessChartResponse {
            processes: vec![
                process("a", 20.0, 8.0),
                process("b", 5.0, 2.0),
                process("c", 0.5, 0.5),
                process("d", 1.0, 1.0),
            ],
            pie_chart: PieChartData::default(),
            ..ProcessChartResponse::default()
        };
        let view = pie_view(&response);
        let counts = |s: &[Slice]| s.iter().map(|s| s.count).collect::<Vec<_>>();
        assert_eq!(counts(&view.memory), vec![1, 1, 2]);
        assert_eq!(counts(&view.cpu), vec![1, 1, 2]);
        assert_eq!(view.memory[0].color, "#ef4444");
        assert_eq!(view.cpu[2].color, "#059669");
    }

    #[test]
    fn pie_keeps_backend_distributions() {
        let response = ProcessChartResponse {
            pie_chart: PieChartData {
                memory_distribution: Distribution {
                    labels: vec!["High".into(), "Low".into()],
                    data: vec![3],
                    colors: vec!["#ef4444".into()],
                },
                cpu_distribution: Distribution::default(),
            },
            ..ProcessChartResponse::default()
        };
        let view = pie_view(&response);
        assert_eq!(view.memory.len(), 2);
        assert_eq!(view.memory[1].count, 0);
        assert_eq!(view.memory[1].color, "");
        assert_eq!(view.cpu.len(), 3);
    }

    #[test]
    fn history_window_is_clamped() {
        assert_eq!(clamp_history_hours(0), 1);
        assert_eq!(clamp_history_hours(24), 24);
        assert_eq!(clamp_history_hours(1000), 168);
    }
}
