//! Footer: newest toast plus key hints.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use jarm_core::Toast;

use crate::theme;

const HINTS: [(&str, &str); 8] = [
    ("[ ]", "alerts"),
    ("{ }", "notifications"),
    ("r/R", "read"),
    ("1-4", "chart"),
    ("+/-", "window"),
    ("a", "auto"),
    ("s/x", "monitor"),
    ("q", "quit"),
];

pub fn render(frame: &mut Frame, area: Rect, toasts: &[Toast]) {
    let notice = toasts.first().map_or_else(Line::default, |toast| {
        let color = theme::toast(toast.level);
        let mut spans = vec![Span::styled(
            toast.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if !toast.message.is_empty() {
            spans.push(Span::styled(format!("  {}", toast.message), theme::table_row()));
        }
        if toasts.len() > 1 {
            spans.push(Span::styled(format!("  (+{})", toasts.len() - 1), theme::dim()));
        }
        Line::from(spans)
    });

    let hints = Line::from(
        HINTS
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(*key, theme::key_hint_key()),
                    Span::styled(format!(" {label}  "), theme::dim()),
                ]
            })
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(vec![notice, hints]), area);
}
