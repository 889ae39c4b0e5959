//! The one visible chart: bar, gauge, pie or line.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Chart, Dataset, Gauge, GraphType, Paragraph},
};

use jarm_core::{
    BarChartView, ChartData, ChartKind, DashboardView, Dial, GaugeView, LineChartView,
    PieChartView, Slice,
};

use crate::theme;

use super::panel;

pub fn title(view: &DashboardView<'_>) -> String {
    let auto = if view.chart_auto_refresh { "auto" } else { "paused" };
    match view.active_chart {
        ChartKind::Line => format!("Chart · line · {}h · {auto}", view.history_hours),
        kind => format!("Chart · {kind} · {auto}"),
    }
}

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let block = panel(title(view));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match view.chart {
        Some(ChartData::Bar(bar)) => render_bar(frame, inner, bar),
        Some(ChartData::Gauge(gauge)) => render_gauge(frame, inner, gauge),
        Some(ChartData::Pie(pie)) => render_pie(frame, inner, pie),
        Some(ChartData::Line(line)) => render_line(frame, inner, line),
        None => frame.render_widget(
            Paragraph::new(Span::styled("Loading chart…", theme::dim())),
            inner,
        ),
    }
}

/// Percent value in tenths, for integer bar heights.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn tenths(value: f64) -> u64 {
    (value.max(0.0) * 10.0).round() as u64
}

fn render_bar(frame: &mut Frame, area: Rect, view: &BarChartView) {
    let bars: Vec<Bar> = view
        .labels
        .iter()
        .zip(&view.memory)
        .map(|(label, memory)| {
            Bar::default()
                .label(Line::from(label.clone()))
                .value(tenths(*memory))
                .text_value(format!("{memory:.1}%"))
                .style(Style::default().fg(theme::MEMORY_SERIES))
        })
        .collect();

    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(theme::TEXT));
    frame.render_widget(chart, area);
}

fn dial_gauge(label: &str, dial: &Dial, unit: &str) -> Gauge<'static> {
    let ratio = if dial.max > 0.0 {
        (dial.value / dial.max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Gauge::default()
        .gauge_style(Style::default().fg(theme::hex(&dial.color)).bg(theme::BG_HIGHLIGHT))
        .ratio(ratio)
        .label(format!("{label} {:.0}{unit} / {:.0}", dial.value, dial.max))
}

fn render_gauge(frame: &mut Frame, area: Rect, view: &GaugeView) {
    let [cpu, memory, processes] = Layout::vertical([Constraint::Length(1); 3])
        .spacing(1)
        .areas(area);
    frame.render_widget(dial_gauge("CPU", &view.cpu, "%"), cpu);
    frame.render_widget(dial_gauge("Memory", &view.memory, "%"), memory);
    frame.render_widget(dial_gauge("Processes", &view.processes, ""), processes);
}

fn slice_lines(title: &str, slices: &[Slice], width: u16) -> Vec<Line<'static>> {
    let total: u64 = slices.iter().map(|s| s.count).sum();
    let bar_room = u64::from(width.saturating_sub(24).max(4));

    let mut lines = vec![Line::from(Span::styled(title.to_owned(), theme::title_style()))];
    for slice in slices {
        let filled = if total == 0 {
            0
        } else {
            usize::try_from(slice.count.saturating_mul(bar_room) / total).unwrap_or(0)
        };
        lines.push(Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(theme::hex(&slice.color))),
            Span::styled(format!(" {} {}", slice.count, slice.label), theme::table_row()),
        ]));
    }
    lines
}

fn render_pie(frame: &mut Frame, area: Rect, view: &PieChartView) {
    let [memory, cpu] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    frame.render_widget(
        Paragraph::new(slice_lines("Memory", &view.memory, memory.width)),
        memory,
    );
    frame.render_widget(Paragraph::new(slice_lines("CPU", &view.cpu, cpu.width)), cpu);
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn render_line(frame: &mut Frame, area: Rect, view: &LineChartView) {
    if view.points.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("No samples in the last {}h", view.hours),
                theme::dim(),
            )),
            area,
        );
        return;
    }

    let cpu: Vec<(f64, f64)> = view
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.cpu_percent))
        .collect();
    let memory: Vec<(f64, f64)> = view
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.memory_percent))
        .collect();
    let x_max = (view.points.len().saturating_sub(1) as f64).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("CPU")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::CPU_SERIES))
            .data(&cpu),
        Dataset::default()
            .name("Memory")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::MEMORY_SERIES))
            .data(&memory),
    ];

    let first = view.points.first().and_then(|p| p.timestamp);
    let last = view.points.last().and_then(|p| p.timestamp);
    let axis_label = |at: Option<chrono::DateTime<chrono::Utc>>| {
        Span::styled(
            at.map_or_else(String::new, |t| t.format("%m-%d %H:%M").to_string()),
            theme::dim(),
        )
    };

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![axis_label(first), axis_label(last)])
                .style(theme::dim()),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 100.0])
                .labels(vec![
                    Span::styled("0", theme::dim()),
                    Span::styled("50", theme::dim()),
                    Span::styled("100", theme::dim()),
                ])
                .style(theme::dim()),
        );
    frame.render_widget(chart, area);
}
