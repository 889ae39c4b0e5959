//! Live CPU and memory gauges.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};

use jarm_core::charts::{DialMetric, gauge_level};
use jarm_core::DashboardView;

use crate::theme;

use super::panel;

fn gauge(label: &str, percent: f64) -> Gauge<'static> {
    let level = gauge_level(percent, DialMetric::Percent);
    Gauge::default()
        .gauge_style(Style::default().fg(theme::severity(level)).bg(theme::BG_HIGHLIGHT))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{label} {percent:.1}%"))
}

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let block = panel("System".into());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(metrics) = view.metrics else {
        frame.render_widget(Paragraph::new(Span::styled("No metrics yet", theme::dim())), inner);
        return;
    };

    let [cpu, memory, summary] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .spacing(1)
    .areas(inner);

    frame.render_widget(gauge("CPU", metrics.cpu_percent), cpu);
    frame.render_widget(gauge("Memory", metrics.memory_percent), memory);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("processes ", theme::dim()),
            Span::styled(metrics.active_processes.to_string(), theme::table_row()),
            Span::styled("   samples ", theme::dim()),
            Span::styled(metrics.data_points_count.to_string(), theme::table_row()),
        ])),
        summary,
    );
}
