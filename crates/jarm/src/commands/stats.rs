//! Per-agent statistics.

use std::collections::BTreeMap;

use serde::Serialize;
use tabled::Tabled;

use jarm_api::ApiClient;
use jarm_core::queries;

use crate::cli::{GlobalOpts, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct CategoryCount {
    category: String,
    tasks: u64,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Tasks")]
    tasks: u64,
}

/// Busiest category first; ties stay alphabetical.
fn by_count(counts: BTreeMap<String, u64>) -> Vec<CategoryCount> {
    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, tasks)| CategoryCount { category, tasks })
        .collect();
    rows.sort_by(|a, b| b.tasks.cmp(&a.tasks));
    rows
}

pub async fn handle(api: &ApiClient, args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        StatsCommand::Tasks => {
            let rows = by_count(queries::task_stats(api).await?);
            output::render_list(
                &global.output,
                &rows,
                |c| CategoryRow {
                    category: c.category.clone(),
                    tasks: c.tasks,
                },
                |c| format!("{}\t{}", c.category, c.tasks),
            )?
        }
        StatsCommand::Learning => {
            let stats = queries::learning_stats(api).await?;
            output::render_single(
                &global.output,
                &stats,
                |s| {
                    output::detail(&[
                        ("states", s.total_states.to_string()),
                        ("visits", s.total_visits.to_string()),
                        ("recent", s.recent_activity.to_string()),
                        ("top states", s.top_states.len().to_string()),
                    ])
                },
                |s| s.total_states.to_string(),
            )?
        }
        StatsCommand::Security => {
            let stats = queries::security_stats(api).await?;
            output::render_single(
                &global.output,
                &stats,
                |s| {
                    output::detail(&[
                        ("alerts", s.total_alerts.to_string()),
                        ("last 24h", s.recent_alerts.to_string()),
                    ])
                },
                |s| s.total_alerts.to_string(),
            )?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
