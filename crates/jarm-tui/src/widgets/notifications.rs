//! Paged notifications with a selectable row for mark-as-read.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use jarm_core::DashboardView;

use crate::theme;

use super::{panel, short_time};

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>, selected: usize) {
    let block = panel(format!(
        "Notifications {} unread · {} · {{ }}",
        view.unread_count, view.notifications_page
    ));

    if view.notifications.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No notifications", theme::dim())).block(block),
            area,
        );
        return;
    }

    let rows = view.notifications.iter().map(|row| {
        let n = row.notification;
        // The action column only appears while marking read is possible.
        let action = if row.can_mark_read { "r: mark read" } else { "" };
        let style = if n.is_read {
            theme::dim()
        } else {
            theme::table_row()
        };
        Row::new(vec![
            Cell::from(Span::styled(
                n.severity.label(),
                Style::default().fg(theme::severity(n.severity)),
            )),
            Cell::from(n.message.clone()),
            Cell::from(short_time(n.timestamp)),
            Cell::from(Span::styled(action, theme::key_hint_key())),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(Row::new(["Severity", "Message", "Time", ""]).style(theme::table_header()))
    .row_highlight_style(theme::table_selected())
    .block(block);

    let selected = selected.min(view.notifications.len().saturating_sub(1));
    let mut state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use jarm_core::{Notification, NotificationId, NotificationRow, Severity};

    use super::*;
    use crate::widgets::test_support::{draw, empty_view};

    fn notification(id: &str, is_read: bool) -> Notification {
        Notification {
            id: Some(NotificationId::new(id)),
            severity: Severity::High,
            category: "security".into(),
            message: format!("event {id}"),
            timestamp: None,
            is_read,
        }
    }

    #[test]
    fn read_rows_have_no_mark_action() {
        let unread = notification("41", false);
        let read = notification("42", true);
        let mut view = empty_view();
        view.notifications = vec![
            NotificationRow { notification: &unread, can_mark_read: true },
            NotificationRow { notification: &read, can_mark_read: false },
        ];

        let text = draw(80, 6, |f| render(f, f.area(), &view, 0));
        assert_eq!(text.matches("mark read").count(), 1);
        assert!(text.contains("event 42"));
    }
}
