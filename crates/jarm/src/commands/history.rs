//! Monitoring session history.

use tabled::Tabled;

use jarm_api::ApiClient;
use jarm_core::{MonitoringSession, queries};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::timestamp;

/// One row per recorded application, grouped by session.
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Session")]
    session: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "PID")]
    pid: String,
    #[tabled(rename = "CPU %")]
    cpu: String,
    #[tabled(rename = "Mem %")]
    memory: String,
}

fn rows(session: &MonitoringSession) -> Vec<HistoryRow> {
    if session.applications.is_empty() {
        return vec![HistoryRow {
            session: session.session_id.clone(),
            started: timestamp(session.started_at),
            application: "-".into(),
            pid: "-".into(),
            cpu: "-".into(),
            memory: "-".into(),
        }];
    }
    session
        .applications
        .iter()
        .map(|app| HistoryRow {
            session: session.session_id.clone(),
            started: timestamp(app.started_at.or(session.started_at)),
            application: app.name.clone(),
            pid: app.pid.map_or_else(|| "-".into(), |p| p.to_string()),
            cpu: format!("{:.1}", app.cpu_percent),
            memory: format!("{:.1}", app.memory_percent),
        })
        .collect()
}

pub async fn handle(api: &ApiClient, global: &GlobalOpts) -> Result<(), CliError> {
    let sessions = queries::application_history(api).await?;
    let out = match global.output {
        crate::cli::OutputFormat::Table => {
            let flat: Vec<HistoryRow> = sessions.iter().flat_map(rows).collect();
            tabled::Table::new(flat)
                .with(tabled::settings::Style::rounded())
                .to_string()
        }
        _ => output::render_single(&global.output, &sessions, |_| String::new(), |all| {
            all.iter()
                .map(|s| s.session_id.clone())
                .collect::<Vec<_>>()
                .join("\n")
        })?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
