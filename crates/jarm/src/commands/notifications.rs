//! Notification listing and read marking.

use tabled::Tabled;

use jarm_api::ApiClient;
use jarm_core::{Notification, NotificationId, queries};

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand};
use crate::error::CliError;
use crate::output;

use super::timestamp;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Read")]
    read: String,
}

fn row(n: &Notification, color: bool) -> NotificationRow {
    NotificationRow {
        id: n.id.as_ref().map_or_else(|| "-".into(), ToString::to_string),
        time: timestamp(n.timestamp),
        severity: output::severity(n.severity, color),
        category: n.category.clone(),
        message: n.message.clone(),
        read: output::yes_no(n.is_read),
    }
}

pub async fn handle(
    api: &ApiClient,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NotificationsCommand::List { unread } => {
            let mut notifications = queries::notifications(api).await?;
            if unread {
                notifications.retain(|n| !n.is_read);
            }
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &notifications,
                |n| row(n, color),
                |n| n.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NotificationsCommand::Read { id } => {
            let id = id.to_string();
            queries::mark_notification_read(api, &NotificationId::new(&id))
                .await
                .map_err(|e| match CliError::from(e) {
                    CliError::NotFound { .. } => CliError::NotFound {
                        resource_type: "notification".into(),
                        identifier: id.clone(),
                        list_command: "notifications list".into(),
                    },
                    other => other,
                })?;
            output::print_status(&format!("Notification {id} marked read"), global.quiet);
            Ok(())
        }

        NotificationsCommand::ReadAll => {
            queries::mark_all_notifications_read(api).await?;
            output::print_status("All notifications marked read", global.quiet);
            Ok(())
        }
    }
}
