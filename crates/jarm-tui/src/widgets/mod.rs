//! Dashboard panels. Each `render` draws one panel from a `DashboardView`.

pub mod alerts;
pub mod analytics;
pub mod chart;
pub mod header;
pub mod metrics;
pub mod notifications;
pub mod processes;
pub mod toasts;

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Span,
    widgets::{Block, BorderType},
};

use jarm_core::{DashboardView, Toast};

use crate::theme;

/// Presentation state that lives in the TUI rather than the core.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Selected row within the visible notification page.
    pub selected_notification: usize,
    pub now: DateTime<Utc>,
}

pub(crate) fn panel(title: String) -> Block<'static> {
    Block::bordered()
        .title(Span::styled(format!(" {title} "), theme::title_style()))
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
}

pub(crate) fn short_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "--:--:--".into(), |t| t.format("%H:%M:%S").to_string())
}

/// Full-screen layout.
pub fn render(frame: &mut Frame, view: &DashboardView<'_>, ui: &UiState, toasts: &[Toast]) {
    let [header_area, top, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(7),
        Constraint::Min(10),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    header::render(frame, header_area, view, ui.now);

    let [metrics_area, analytics_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(top);
    metrics::render(frame, metrics_area, view);
    analytics::render(frame, analytics_area, view);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
    let [alerts_area, notifications_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(left);
    alerts::render(frame, alerts_area, view);
    notifications::render(frame, notifications_area, view, ui.selected_notification);

    let [chart_area, processes_area] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(right);
    chart::render(frame, chart_area, view);
    processes::render(frame, processes_area, view);

    toasts::render(frame, footer, toasts);
}
