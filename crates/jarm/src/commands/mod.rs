//! Command dispatch: bridges CLI args -> core queries -> output formatting.

pub mod alerts;
pub mod analytics;
pub mod diagnostics;
pub mod export;
pub mod history;
pub mod monitor;
pub mod notifications;
pub mod processes;
pub mod stats;
pub mod status;
pub mod tasks;

use jarm_api::ApiClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(cmd: Command, api: &ApiClient, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => status::handle(api, &args, global).await,
        Command::Monitor(args) => monitor::handle(api, args, global).await,
        Command::Tasks(args) => tasks::handle(api, args, global).await,
        Command::Alerts => alerts::handle(api, global).await,
        Command::Notifications(args) => notifications::handle(api, args, global).await,
        Command::Processes(args) => processes::handle(api, &args, global).await,
        Command::Analytics(args) => analytics::handle(api, &args, global).await,
        Command::History => history::handle(api, global).await,
        Command::Diagnostics => diagnostics::handle(api, global).await,
        Command::Stats(args) => stats::handle(api, args, global).await,
        Command::Export(args) => export::handle(api, args, global).await,
        Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "completions need no backend".into(),
        }),
    }
}

pub(crate) fn timestamp(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}
