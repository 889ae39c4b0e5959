//! Title bar: connection indicator, monitoring state, severity badge, data age.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use jarm_core::{DashboardView, TransportMode};

use crate::theme;

use super::panel;

/// `"●  Live"` over push, `"◌ Polling"` otherwise.
pub fn connection_label(view: &DashboardView<'_>) -> (&'static str, ratatui::style::Color) {
    if view.connection.mode == TransportMode::Push && view.connection.connected {
        ("● Live", theme::LOW)
    } else {
        ("◌ Polling", theme::MEDIUM)
    }
}

/// Age of the freshest update across all streams.
pub fn age_label(view: &DashboardView<'_>, now: DateTime<Utc>) -> String {
    let Some(latest) = view.last_updated.values().max() else {
        return "waiting for data".into();
    };
    let secs = (now - *latest).num_seconds().max(0);
    match secs {
        0..=1 => "updated just now".into(),
        2..=59 => format!("updated {secs}s ago"),
        _ => format!("updated {}m ago", secs / 60),
    }
}

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>, now: DateTime<Utc>) {
    let (connection, connection_color) = connection_label(view);

    let monitoring = match (view.monitoring_active, view.monitoring_pending) {
        (true, true) => "starting…",
        (false, true) => "stopping…",
        (true, false) => "running",
        (false, false) => "stopped",
    };

    let badge_color = view.badge.highest.map_or(theme::LOW, theme::severity);

    let line = Line::from(vec![
        Span::styled(connection, Style::default().fg(connection_color)),
        Span::styled("  │  monitoring ", theme::dim()),
        Span::styled(monitoring, Style::default().fg(theme::TEXT)),
        Span::styled("  │  ", theme::dim()),
        Span::styled(
            view.badge.label(),
            Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  │  {}", age_label(view, now)), theme::dim()),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(panel("JARM".into())),
        area,
    );
}
