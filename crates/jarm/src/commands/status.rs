//! System status, liveness and readiness.

use jarm_api::ApiClient;
use jarm_core::{Readiness, queries};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

use super::timestamp;

fn readiness_detail(r: &Readiness) -> String {
    let mut pairs = vec![
        ("ready", output::yes_no(r.ready)),
        ("checked", timestamp(r.timestamp)),
    ];
    pairs.extend(r.checks.iter().map(|c| {
        let state = match (&c.error, c.ok) {
            (_, true) => "ok".to_owned(),
            (Some(error), false) => format!("failing: {error}"),
            (None, false) => "failing".to_owned(),
        };
        (c.name.as_str(), state)
    }));
    output::detail(&pairs)
}

/// Prints the checks either way; a failing check becomes the exit status.
async fn ready(api: &ApiClient, global: &GlobalOpts) -> Result<(), CliError> {
    let readiness = queries::readiness(api).await?;
    let out = output::render_single(&global.output, &readiness, readiness_detail, |r| {
        if r.ready { "ready" } else { "not-ready" }.into()
    })?;
    output::print_output(&out, global.quiet);

    if readiness.ready {
        return Ok(());
    }
    let failing: Vec<&str> = readiness.failing().map(|c| c.name.as_str()).collect();
    Err(CliError::NotReady {
        failing: if failing.is_empty() {
            "no checks reported".into()
        } else {
            failing.join(", ")
        },
    })
}

pub async fn handle(api: &ApiClient, args: &StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.ready {
        return ready(api, global).await;
    }

    let out = if args.health {
        let health = queries::health(api).await?;
        output::render_single(
            &global.output,
            &health,
            |h| {
                output::detail(&[
                    ("status", h.status.clone()),
                    ("monitoring", output::yes_no(h.system_running)),
                    ("uptime", format!("{:.0}s", h.uptime_seconds)),
                    ("checked", timestamp(h.timestamp)),
                ])
            },
            |h| h.status.clone(),
        )?
    } else {
        let status = queries::status(api).await?;
        output::render_single(
            &global.output,
            &status,
            |s| {
                let mut pairs = vec![
                    ("monitoring", output::yes_no(s.system_running)),
                    ("updated", timestamp(s.timestamp)),
                ];
                pairs.extend(s.agents.iter().map(|(name, state)| (name.as_str(), state.clone())));
                output::detail(&pairs)
            },
            |s| if s.system_running { "running" } else { "stopped" }.into(),
        )?
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
