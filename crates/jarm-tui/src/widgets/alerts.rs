//! Paged list of active alerts.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Paragraph, Row, Table},
};

use jarm_core::DashboardView;

use crate::theme;

use super::{panel, short_time};

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let block = panel(format!(
        "Alerts {} · {} · [ ]",
        view.alert_count, view.alerts_page
    ));

    if view.alerts.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No active alerts", theme::dim())).block(block),
            area,
        );
        return;
    }

    let rows = view.alerts.iter().map(|alert| {
        Row::new(vec![
            Cell::from(Span::styled(
                alert.severity.label(),
                Style::default().fg(theme::severity(alert.severity)),
            )),
            Cell::from(alert.kind.clone()),
            Cell::from(alert.message.clone()),
            Cell::from(short_time(alert.created_at)),
        ])
        .style(theme::table_row())
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Min(12),
            Constraint::Length(8),
        ],
    )
    .header(Row::new(["Severity", "Type", "Message", "Time"]).style(theme::table_header()))
    .block(block);

    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use jarm_core::{Alert, AlertId, Severity};

    use super::*;
    use crate::widgets::test_support::{draw, empty_view};

    #[test]
    fn empty_list_renders_placeholder_and_page_zero() {
        let view = empty_view();
        let text = draw(60, 6, |f| render(f, f.area(), &view));
        assert!(text.contains("No active alerts"));
        assert!(text.contains("Page 0 of 0"));
    }

    #[test]
    fn rows_show_severity_and_message() {
        let alerts = vec![Alert {
            id: Some(AlertId::new("17")),
            kind: "high_cpu".into(),
            severity: Severity::Critical,
            severity_recognized: true,
            message: "CPU above 95%".into(),
            source: "system_monitor".into(),
            created_at: None,
        }];
        let mut view = empty_view();
        view.alerts = &alerts;
        view.alert_count = 1;
        view.alerts_page = "Page 1 of 1".into();

        let text = draw(70, 6, |f| render(f, f.area(), &view));
        assert!(text.contains("Critical"));
        assert!(text.contains("CPU above 95%"));
        assert!(text.contains("Alerts 1"));
    }
}
