//! Analytics summary panel.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use jarm_core::DashboardView;

use crate::theme;

use super::panel;

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let Some(a) = view.analytics else {
        frame.render_widget(
            Paragraph::new(Span::styled("No analytics yet", theme::dim()))
                .block(panel("Analytics".into())),
            area,
        );
        return;
    };

    let row = |key: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{key:<10}"), theme::dim()),
            Span::styled(value, theme::table_row()),
        ])
    };

    let top_category = a
        .category_distribution
        .iter()
        .max_by_key(|(_, count)| **count)
        .map_or_else(|| "-".into(), |(name, count)| format!("{name} ({count})"));

    let lines = vec![
        row("tasks", a.total_tasks.to_string()),
        row("top", top_category),
        row(
            "risk",
            format!("avg {:.2}  max {:.2}", a.risk.average, a.risk.maximum),
        ),
        row("alerts", a.total_alerts.to_string()),
        row(
            "learning",
            format!("{} states / {} visits", a.learning_states, a.learning_visits),
        ),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(panel(format!("Analytics · {}d", a.period_days))),
        area,
    );
}
