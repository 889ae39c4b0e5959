//! Top processes by memory.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Row, Table},
};

use jarm_core::DashboardView;

use crate::theme;

use super::panel;

pub fn render(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let rows = view.processes.iter().map(|p| {
        Row::new(vec![
            p.pid.to_string(),
            p.name.clone(),
            format!("{:.1}", p.cpu_percent),
            format!("{:.1}", p.memory_percent),
        ])
        .style(theme::table_row())
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(Row::new(["PID", "Name", "CPU%", "MEM%"]).style(theme::table_header()))
    .block(panel(format!("Processes {}", view.processes.len())));

    frame.render_widget(table, area);
}
