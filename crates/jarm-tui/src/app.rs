//! Application core: event loop and action dispatch.
//!
//! The loop owns the `Dashboard`. Terminal events and backend updates are
//! multiplexed in one `select!`, so all dashboard state is mutated from
//! this task only.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use color_eyre::eyre::Result;
use tracing::{debug, info};

use jarm_core::{ControlId, Dashboard, NavAction};

use crate::action::{Action, step_history};
use crate::event::{Event, EventReader};
use crate::sink::ToastLog;
use crate::tui::Tui;
use crate::widgets::{self, UiState};

const RENDER_RATE: Duration = Duration::from_millis(100);

pub struct App {
    dashboard: Dashboard,
    toasts: Arc<ToastLog>,
    selected_notification: usize,
    running: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, toasts: Arc<ToastLog>) -> Self {
        Self {
            dashboard,
            toasts,
            selected_notification: 0,
            running: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.dashboard.start();
        let mut events = EventReader::new(RENDER_RATE);
        info!("TUI event loop started");

        while self.running {
            tokio::select! {
                biased;

                event = events.next() => match event {
                    Some(Event::Key(key)) => {
                        if let Some(action) = Action::from_key(key) {
                            self.apply(action);
                        }
                    }
                    Some(Event::Render | Event::Resize(..)) => self.draw(&mut tui)?,
                    None => break,
                },

                update = self.dashboard.next_update() => match update {
                    Some(update) => self.dashboard.apply(update),
                    None => break,
                },
            }
        }

        events.stop();
        self.dashboard.shutdown();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        // Idempotent: only the first frame actually binds.
        self.dashboard.bind_controls();

        let toasts = self.toasts.visible(Instant::now());
        let ui = UiState {
            selected_notification: self.selected_notification,
            now: Utc::now(),
        };
        let view = self.dashboard.view();
        tui.draw(|frame| widgets::render(frame, &view, &ui, &toasts))
    }

    fn bound(&self, control: ControlId, action: NavAction) -> bool {
        self.dashboard.bindings().is_bound(control, action)
    }

    fn visible_notifications(&mut self) -> usize {
        self.dashboard.view().notifications.len()
    }

    pub fn apply(&mut self, action: Action) {
        debug!(?action, "action");
        match action {
            Action::Quit => self.running = false,

            Action::PageAlerts(nav) => {
                if self.bound(ControlId::AlertList, nav) {
                    self.dashboard.page_alerts(nav);
                }
            }
            Action::PageNotifications(nav) => {
                if self.bound(ControlId::NotificationList, nav)
                    && self.dashboard.page_notifications(nav)
                {
                    self.selected_notification = 0;
                }
            }

            Action::SelectNext => {
                let rows = self.visible_notifications();
                self.selected_notification =
                    (self.selected_notification + 1).min(rows.saturating_sub(1));
            }
            Action::SelectPrev => {
                self.selected_notification = self.selected_notification.saturating_sub(1);
            }

            Action::MarkSelectedRead => {
                if !self.bound(ControlId::NotificationList, NavAction::MarkRead) {
                    return;
                }
                let selected = self.selected_notification;
                let id = self
                    .dashboard
                    .view()
                    .notifications
                    .get(selected)
                    .filter(|row| row.can_mark_read)
                    .and_then(|row| row.notification.id.clone());
                if let Some(id) = id {
                    self.dashboard.mark_notification_read(&id);
                }
            }
            Action::MarkAllRead => {
                if self.bound(ControlId::NotificationList, NavAction::MarkAllRead) {
                    self.dashboard.mark_all_read();
                }
            }

            Action::SelectChart(kind) => self.dashboard.select_chart(kind),
            Action::WidenHistory | Action::NarrowHistory => {
                let current = self.dashboard.charts().history_hours();
                let next = step_history(current, action == Action::WidenHistory);
                self.dashboard.set_history_window(next);
            }
            Action::ToggleChartAutoRefresh => {
                self.dashboard.toggle_chart_auto_refresh();
            }

            Action::StartMonitoring => self.dashboard.start_monitoring(),
            Action::StopMonitoring => self.dashboard.stop_monitoring(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use url::Url;

    use jarm_core::{
        ChartKind, DashboardConfig, Notification, NotificationId, RecordingSink, Severity,
        StreamKind, StreamPayload, StreamUpdate, Update,
    };

    use super::*;

    // Port 9 (discard): spawned requests fail fast and are never awaited.
    fn app() -> App {
        let mut config = DashboardConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        config.page_size = 2;
        let dashboard = Dashboard::new(config, Arc::new(RecordingSink::new(false))).unwrap();
        App::new(dashboard, Arc::new(ToastLog::default()))
    }

    fn notifications(ids: &[&str]) -> Update {
        let list = ids
            .iter()
            .map(|id| Notification {
                id: Some(NotificationId::new(*id)),
                severity: Severity::Medium,
                category: "system".into(),
                message: format!("n{id}"),
                timestamp: None,
                is_read: false,
            })
            .collect();
        Update::Stream(StreamUpdate {
            kind: StreamKind::Notifications,
            payload: StreamPayload::Notifications(list),
            received_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn paging_waits_for_bindings() {
        let mut app = app();
        app.dashboard.apply(notifications(&["1", "2", "3"]));

        app.apply(Action::PageNotifications(NavAction::Next));
        assert_eq!(app.dashboard.view().notifications_page, "Page 1 of 2");

        app.dashboard.bind_controls();
        app.apply(Action::PageNotifications(NavAction::Next));
        assert_eq!(app.dashboard.view().notifications_page, "Page 2 of 2");
    }

    #[tokio::test]
    async fn mark_selected_read_targets_highlighted_row() {
        let mut app = app();
        app.dashboard.bind_controls();
        app.dashboard.apply(notifications(&["41", "42"]));

        app.apply(Action::SelectNext);
        app.apply(Action::MarkSelectedRead);

        let view = app.dashboard.view();
        let readable: Vec<bool> = view.notifications.iter().map(|r| r.can_mark_read).collect();
        assert_eq!(readable, vec![true, false]);
    }

    #[tokio::test]
    async fn selection_stays_within_page() {
        let mut app = app();
        app.dashboard.apply(notifications(&["1", "2"]));
        for _ in 0..5 {
            app.apply(Action::SelectNext);
        }
        assert_eq!(app.selected_notification, 1);
        for _ in 0..5 {
            app.apply(Action::SelectPrev);
        }
        assert_eq!(app.selected_notification, 0);
    }

    #[tokio::test]
    async fn history_keys_step_line_window() {
        let mut app = app();
        app.apply(Action::SelectChart(ChartKind::Line));
        app.apply(Action::WidenHistory);
        assert_eq!(app.dashboard.charts().history_hours(), 48);
        app.apply(Action::NarrowHistory);
        app.apply(Action::NarrowHistory);
        assert_eq!(app.dashboard.charts().history_hours(), 12);
        assert_eq!(app.dashboard.charts().active(), ChartKind::Line);
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut app = app();
        assert!(app.running);
        app.apply(Action::Quit);
        assert!(!app.running);
    }
}
