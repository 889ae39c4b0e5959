//! Terminal implementation of the dashboard's notification sink.
//!
//! Audio cues become terminal bell pulses played on a spawned task; toasts
//! and system notifications land in a shared [`ToastLog`] rendered in the
//! footer.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use jarm_core::{AudioCue, NotificationSink, Toast, ToastLevel};

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(6);
const TOAST_CAPACITY: usize = 8;

#[derive(Debug, Default)]
pub struct ToastLog {
    entries: Mutex<VecDeque<(Instant, Toast)>>,
}

impl ToastLog {
    pub fn push(&self, toast: Toast) {
        self.push_at(Instant::now(), toast);
    }

    fn push_at(&self, at: Instant, toast: Toast) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.len() == TOAST_CAPACITY {
            entries.pop_front();
        }
        entries.push_back((at, toast));
    }

    /// Toasts younger than [`TOAST_TTL`], newest first. Expired ones are
    /// dropped.
    pub fn visible(&self, now: Instant) -> Vec<Toast> {
        let Ok(mut entries) = self.entries.lock() else {
            return Vec::new();
        };
        entries.retain(|(at, _)| now.saturating_duration_since(*at) < TOAST_TTL);
        entries.iter().rev().map(|(_, toast)| toast.clone()).collect()
    }
}

pub struct TerminalSink {
    audio: bool,
    toasts: Arc<ToastLog>,
}

impl TerminalSink {
    pub fn new(audio: bool, toasts: Arc<ToastLog>) -> Self {
        Self { audio, toasts }
    }
}

impl NotificationSink for TerminalSink {
    fn audio_available(&self) -> bool {
        self.audio
    }

    fn play_cue(&self, cue: AudioCue) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(?cue, "no runtime for audio cue");
            return;
        };
        runtime.spawn(async move {
            for pulse in cue.pattern() {
                {
                    let mut out = std::io::stdout().lock();
                    let _ = out.write_all(b"\x07");
                    let _ = out.flush();
                }
                tokio::time::sleep(pulse.duration + pulse.gap).await;
            }
        });
    }

    fn show_toast(&self, toast: Toast) {
        self.toasts.push(toast);
    }

    fn show_system_notification(&self, title: &str, body: &str) {
        // No desktop notifier in a terminal; surface it in the footer too.
        self.toasts.push(Toast::new(ToastLevel::Info, title, body));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn newest_toast_first() {
        let log = ToastLog::default();
        let now = Instant::now();
        log.push_at(now, Toast::new(ToastLevel::Info, "a", "first"));
        log.push_at(now, Toast::new(ToastLevel::Error, "b", "second"));

        let titles: Vec<_> = log.visible(now).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["b".to_owned(), "a".to_owned()]);
    }

    #[test]
    fn expired_toasts_are_dropped() {
        let log = ToastLog::default();
        let start = Instant::now();
        log.push_at(start, Toast::new(ToastLevel::Info, "old", ""));

        assert_eq!(log.visible(start + TOAST_TTL).len(), 0);
    }

    #[test]
    fn log_is_bounded() {
        let log = ToastLog::default();
        let now = Instant::now();
        for i in 0..20 {
            log.push_at(now, Toast::new(ToastLevel::Info, i.to_string(), ""));
        }
        let visible = log.visible(now);
        assert_eq!(visible.len(), TOAST_CAPACITY);
        assert_eq!(visible[0].title, "19");
    }

    #[test]
    fn system_notifications_become_toasts() {
        let log = Arc::new(ToastLog::default());
        let sink = TerminalSink::new(false, Arc::clone(&log));
        sink.show_system_notification("3 new alerts", "Highest: Critical");

        let visible = log.visible(Instant::now());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "Highest: Critical");
        assert!(!sink.audio_available());
    }
}
