//! Top processes and their open files.

use tabled::Tabled;

use jarm_api::ApiClient;
use jarm_core::{OpenFiles, ProcessSample, queries};

use crate::cli::{GlobalOpts, ProcessesArgs, ProcessesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "PID")]
    pid: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "CPU %")]
    cpu: String,
    #[tabled(rename = "Mem %")]
    memory: String,
}

impl From<&ProcessSample> for ProcessRow {
    fn from(p: &ProcessSample) -> Self {
        Self {
            pid: p.pid,
            name: p.name.clone(),
            user: p.user.clone().unwrap_or_else(|| "-".into()),
            cpu: format!("{:.1}", p.cpu_percent),
            memory: format!("{:.1}", p.memory_percent),
        }
    }
}

fn files_detail(f: &OpenFiles) -> String {
    if f.paths.is_empty() {
        return format!("PID {} has no open files (or access was denied)", f.pid);
    }
    let mut out = format!("PID {} ({} open)\n", f.pid, f.paths.len());
    for path in &f.paths {
        out.push_str("  ");
        out.push_str(path);
        out.push('\n');
    }
    out.trim_end().to_owned()
}

pub async fn handle(api: &ApiClient, args: &ProcessesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ProcessesCommand::Files { pid, limit }) = &args.command {
        let files = queries::process_files(api, *pid, *limit)
            .await
            .map_err(|e| match CliError::from(e) {
                CliError::NotFound { .. } => CliError::NotFound {
                    resource_type: "process".into(),
                    identifier: pid.to_string(),
                    list_command: "processes".into(),
                },
                other => other,
            })?;
        let out = output::render_single(&global.output, &files, files_detail, |f| {
            f.paths.join("\n")
        })?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let processes = queries::processes(api, args.limit.max(1)).await?;
    let out = output::render_list(
        &global.output,
        &processes,
        |p| ProcessRow::from(p),
        |p| p.pid.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
