//! Backend diagnostics snapshot.

use std::fmt::Write as _;

use jarm_api::ApiClient;
use jarm_core::{Diagnostics, queries};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::timestamp;

fn report(d: &Diagnostics) -> String {
    let mut out = output::detail(&[
        ("monitoring", output::yes_no(d.system_running)),
        ("monitor thread", output::yes_no(d.monitor_thread_alive)),
        ("data points", d.data_points.to_string()),
        ("uptime", format!("{}s", d.uptime_seconds)),
        ("server time", timestamp(d.server_time)),
        ("debug", output::yes_no(d.debug)),
        (
            "thresholds",
            format!("cpu {:.0}%, memory {:.0}%", d.cpu_threshold, d.memory_threshold),
        ),
    ]);

    for store in &d.stores {
        let _ = write!(out, "\n\n{}: ", store.name);
        match (&store.error, store.ok) {
            (_, true) => out.push_str("ok"),
            (Some(error), false) => {
                let _ = write!(out, "failing ({error})");
            }
            (None, false) => out.push_str("failing"),
        }
        for (table, rows) in &store.counts {
            let _ = write!(out, "\n  {table:<20} {rows}");
        }
    }

    if !d.versions.is_empty() {
        out.push_str("\n\nversions");
        for (package, version) in &d.versions {
            let _ = write!(out, "\n  {package:<20} {version}");
        }
    }
    out
}

pub async fn handle(api: &ApiClient, global: &GlobalOpts) -> Result<(), CliError> {
    let diagnostics = queries::diagnostics(api).await?;
    let out = output::render_single(&global.output, &diagnostics, report, |d| {
        if d.stores.iter().all(|s| s.ok) { "ok" } else { "degraded" }.into()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
