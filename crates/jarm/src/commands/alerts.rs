//! Active alert listing.

use tabled::Tabled;

use jarm_api::ApiClient;
use jarm_core::{Alert, SeverityBadge, queries};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::timestamp;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn row(alert: &Alert, color: bool) -> AlertRow {
    AlertRow {
        id: alert.id.as_ref().map_or_else(|| "-".into(), ToString::to_string),
        time: timestamp(alert.created_at),
        severity: output::severity(alert.severity, color),
        kind: alert.kind.clone(),
        source: alert.source.clone(),
        message: alert.message.clone(),
    }
}

pub async fn handle(api: &ApiClient, global: &GlobalOpts) -> Result<(), CliError> {
    let alerts = queries::alerts(api).await?;
    let color = output::should_color(&global.color);

    let out = output::render_list(
        &global.output,
        &alerts,
        |a| row(a, color),
        |a| a.id.as_ref().map(ToString::to_string).unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, crate::cli::OutputFormat::Table) {
        let badge = SeverityBadge::from_alerts(&alerts);
        output::print_status(
            &format!("{} active, {}", alerts.len(), badge.label()),
            global.quiet,
        );
    }
    Ok(())
}
