//! Task listing, creation and verdicts.

use tabled::Tabled;

use jarm_api::ApiClient;
use jarm_core::{CoreError, DecisionExplanation, Task, TaskDecision, TaskDraft, queries};

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::timestamp;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.clone().unwrap_or_else(|| "-".into()),
            name: t.name.clone(),
            category: t.category.clone(),
            risk: t.risk_score.map_or_else(|| "-".into(), |r| format!("{r:.2}")),
            status: t.status.clone(),
            created: timestamp(t.created_at),
        }
    }
}

fn task_detail(t: &Task) -> String {
    output::detail(&[
        ("id", t.id.clone().unwrap_or_else(|| "-".into())),
        ("name", t.name.clone()),
        ("command", t.command.clone()),
        ("category", t.category.clone()),
        ("status", t.status.clone()),
    ])
}

fn verdict(v: Option<jarm_core::Verdict>) -> String {
    v.map_or_else(|| "-".into(), |v| v.to_string())
}

fn decision_detail(d: &TaskDecision) -> String {
    output::detail(&[
        ("task", d.task_id.clone().unwrap_or_else(|| "-".into())),
        ("category", d.category.clone()),
        ("verdict", verdict(d.verdict)),
        ("message", d.message.clone()),
        ("decided", timestamp(d.decided_at)),
    ])
}

fn explanation_detail(e: &DecisionExplanation) -> String {
    output::detail(&[
        ("verdict", verdict(e.verdict)),
        ("confidence", format!("{:.0}%", e.confidence * 100.0)),
        ("why", e.explanation.clone()),
    ])
}

/// A 404 here always means the task id.
fn task_not_found(task_id: u64) -> impl FnOnce(CoreError) -> CliError {
    move |e| match e {
        CoreError::NotFound { .. } => CliError::NotFound {
            resource_type: "task".into(),
            identifier: task_id.to_string(),
            list_command: "tasks list".into(),
        },
        other => other.into(),
    }
}

pub async fn handle(api: &ApiClient, args: TasksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List { limit } => {
            let tasks = queries::tasks(api, limit).await?;
            let out = output::render_list(&global.output, &tasks, |t| TaskRow::from(t), |t| {
                t.id.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Create {
            name,
            description,
            command,
        } => {
            let task = queries::create_task(
                api,
                TaskDraft {
                    name,
                    description,
                    command,
                },
            )
            .await?;
            let out = output::render_single(&global.output, &task, task_detail, |t| {
                t.id.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Decision { task_id } => {
            let decision = queries::task_decision(api, task_id)
                .await
                .map_err(task_not_found(task_id))?;
            let out = output::render_single(&global.output, &decision, decision_detail, |d| {
                verdict(d.verdict)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Explain { task_id } => {
            let explanation = queries::explain_task_decision(api, task_id)
                .await
                .map_err(task_not_found(task_id))?;
            let out =
                output::render_single(&global.output, &explanation, explanation_detail, |e| {
                    e.explanation.clone()
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
