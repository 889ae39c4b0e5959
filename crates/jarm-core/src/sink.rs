//! Side-effect boundary for audio cues, toasts and system notifications.
//!
//! The core never talks to a speaker or a desktop notifier directly. It
//! calls a [`NotificationSink`]; the TUI provides a terminal implementation
//! and tests use [`RecordingSink`].

use std::sync::Mutex;
use std::time::Duration;

use crate::model::Severity;

/// A single tone of an audio cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub frequency_hz: u32,
    pub duration: Duration,
    /// Silence after this pulse before the next one starts.
    pub gap: Duration,
    /// Relative loudness, 0.0 to 1.0.
    pub gain: f32,
}

const fn pulse(frequency_hz: u32, duration_ms: u64, gap_ms: u64, gain: f32) -> Pulse {
    Pulse {
        frequency_hz,
        duration: Duration::from_millis(duration_ms),
        gap: Duration::from_millis(gap_ms),
        gain,
    }
}

const CRITICAL_PATTERN: [Pulse; 3] = [
    pulse(880, 150, 200, 0.5),
    pulse(880, 150, 200, 0.5),
    pulse(880, 150, 0, 0.5),
];
const HIGH_PATTERN: [Pulse; 2] = [pulse(660, 200, 250, 0.4), pulse(660, 200, 0, 0.4)];
const MEDIUM_PATTERN: [Pulse; 1] = [pulse(520, 250, 0, 0.3)];
const LOW_PATTERN: [Pulse; 1] = [pulse(330, 250, 0, 0.15)];
const DEFAULT_PATTERN: [Pulse; 1] = [pulse(440, 200, 0, 0.3)];

/// Audio cue selected by the highest severity among newly seen alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Critical,
    High,
    Medium,
    Low,
    /// Used when no severity is known.
    Default,
}

impl AudioCue {
    pub fn for_severity(severity: Option<Severity>) -> Self {
        match severity {
            Some(Severity::Critical) => Self::Critical,
            Some(Severity::High) => Self::High,
            Some(Severity::Medium) => Self::Medium,
            Some(Severity::Low) => Self::Low,
            None => Self::Default,
        }
    }

    pub fn pattern(self) -> &'static [Pulse] {
        match self {
            Self::Critical => &CRITICAL_PATTERN,
            Self::High => &HIGH_PATTERN,
            Self::Medium => &MEDIUM_PATTERN,
            Self::Low => &LOW_PATTERN,
            Self::Default => &DEFAULT_PATTERN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical | Severity::High => Self::Error,
            Severity::Medium => Self::Warning,
            Severity::Low => Self::Info,
        }
    }
}

/// Transient in-app notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Receiver of user-visible side effects.
///
/// Implementations must not block: audio playback in particular is
/// fire-and-forget.
pub trait NotificationSink: Send + Sync {
    /// Whether an audio device is available at all.
    fn audio_available(&self) -> bool;

    fn play_cue(&self, cue: AudioCue);

    fn show_toast(&self, toast: Toast);

    fn show_system_notification(&self, title: &str, body: &str);
}

// ── RecordingSink ────────────────────────────────────────────────────

/// Everything a [`RecordingSink`] observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Cue(AudioCue),
    Toast(Toast),
    System { title: String, body: String },
}

/// Sink that records every call. Useful for tests and headless runs.
#[derive(Debug)]
pub struct RecordingSink {
    audio: bool,
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new(audio: bool) -> Self {
        Self {
            audio,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn cues(&self) -> Vec<AudioCue> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Cue(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Toast(toast) => Some(toast),
                _ => None,
            })
            .collect()
    }

    pub fn system_notifications(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::System { title, body } => Some((title, body)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    fn record(&self, event: SinkEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NotificationSink for RecordingSink {
    fn audio_available(&self) -> bool {
        self.audio
    }

    fn play_cue(&self, cue: AudioCue) {
        self.record(SinkEvent::Cue(cue));
    }

    fn show_toast(&self, toast: Toast) {
        self.record(SinkEvent::Toast(toast));
    }

    fn show_system_notification(&self, title: &str, body: &str) {
        self.record(SinkEvent::System {
            title: title.to_owned(),
            body: body.to_owned(),
        });
    }
}
