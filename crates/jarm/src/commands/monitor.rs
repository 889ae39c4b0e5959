//! Monitoring start/stop.

use jarm_api::ApiClient;
use jarm_core::queries;

use crate::cli::{GlobalOpts, MonitorArgs, MonitorCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(api: &ApiClient, args: MonitorArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let message = match args.command {
        MonitorCommand::Start { interval } => {
            if interval == Some(0) {
                return Err(CliError::Validation {
                    field: "interval".into(),
                    reason: "must be at least 1 second".into(),
                });
            }
            queries::start_monitoring(api, interval).await?
        }
        MonitorCommand::Stop => queries::stop_monitoring(api).await?,
    };
    output::print_status(&message, global.quiet);
    Ok(())
}
