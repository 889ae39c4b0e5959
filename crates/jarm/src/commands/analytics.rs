//! Analytics summary.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use jarm_api::ApiClient;
use jarm_core::{Analytics, queries};

use crate::cli::{AnalyticsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn distribution(title: &str, counts: &BTreeMap<String, u64>) -> String {
    if counts.is_empty() {
        return String::new();
    }
    let mut out = format!("\n{title}\n");
    for (key, count) in counts {
        let _ = writeln!(out, "  {key:<20} {count}");
    }
    out
}

fn summary(a: &Analytics) -> String {
    let mut out = output::detail(&[
        ("period", format!("{} days", a.period_days)),
        ("tasks", a.total_tasks.to_string()),
        (
            "risk",
            format!(
                "avg {:.2} (min {:.2}, max {:.2})",
                a.risk.average, a.risk.minimum, a.risk.maximum
            ),
        ),
        ("alerts", a.total_alerts.to_string()),
        (
            "learning",
            format!(
                "{} states, {} visits, {} recent",
                a.learning_states, a.learning_visits, a.learning_recent_activity
            ),
        ),
    ]);
    out.push_str(&distribution("Tasks by category", &a.category_distribution));
    out.push_str(&distribution("Alerts by severity", &a.severity_distribution));
    out.push_str(&distribution("Alerts by type", &a.type_distribution));
    out.trim_end().to_owned()
}

pub async fn handle(api: &ApiClient, args: &AnalyticsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let analytics = queries::analytics(api, args.days.max(1)).await?;
    let out = output::render_single(&global.output, &analytics, summary, |a| {
        a.total_tasks.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
