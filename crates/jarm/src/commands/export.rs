//! Metric, task and alert export.

use std::path::PathBuf;

use jarm_api::ApiClient;
use jarm_core::queries;

use crate::cli::{ExportArgs, ExportCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dumps are passed through as text regardless of `--output`.
async fn emit(body: &str, out: Option<PathBuf>, quiet: bool) -> Result<(), CliError> {
    match out {
        Some(path) => {
            tokio::fs::write(&path, body.as_bytes()).await?;
            output::print_status(
                &format!("Wrote {} bytes to {}", body.len(), path.display()),
                quiet,
            );
        }
        None => output::print_output(body.trim_end(), quiet),
    }
    Ok(())
}

pub async fn handle(api: &ApiClient, args: ExportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ExportCommand::Metrics { hours, out } => {
            let sql = queries::export_metrics(api, hours).await?;
            emit(&sql, out, global.quiet).await
        }
        ExportCommand::Tasks { out } => {
            let csv = queries::export_tasks(api).await?;
            emit(&csv, out, global.quiet).await
        }
        ExportCommand::Alerts { out } => {
            let csv = queries::export_alerts(api).await?;
            emit(&csv, out, global.quiet).await
        }
    }
}
