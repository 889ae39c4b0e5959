// ── Alert reconciler ──
//
// Diffs each alert snapshot against the ids already surfaced, fires
// side effects at most once per alert identity, and derives the
// persistent severity badge. Reconciliation never fails.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{Alert, AlertId, Severity, SeverityBadge};
use crate::sink::{AudioCue, NotificationSink, Toast, ToastLevel};

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileOutcome {
    pub total: usize,
    /// Alerts that fired side effects in this pass.
    pub new_alerts: Vec<Alert>,
    pub highest_new: Option<Severity>,
    /// The cue that was played, if any.
    pub cue: Option<AudioCue>,
    pub badge: SeverityBadge,
}

#[derive(Debug)]
pub struct AlertReconciler {
    seen: HashSet<AlertId>,
    last_alert_count: usize,
    alerts_cache: Vec<Alert>,
    audio_enabled: bool,
}

impl AlertReconciler {
    pub fn new(audio_enabled: bool) -> Self {
        Self {
            seen: HashSet::new(),
            last_alert_count: 0,
            alerts_cache: Vec::new(),
            audio_enabled,
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts_cache
    }

    pub fn last_alert_count(&self) -> usize {
        self.last_alert_count
    }

    pub fn is_seen(&self, id: &AlertId) -> bool {
        self.seen.contains(id)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    /// Apply a full alert snapshot.
    ///
    /// Side effects fire only when the snapshot grew and monitoring is
    /// active, and only for ids not already surfaced. Ids that vanish from
    /// the snapshot are forgotten, so a returning alert fires again.
    pub fn reconcile(
        &mut self,
        alerts: Vec<Alert>,
        monitoring_active: bool,
        sink: &dyn NotificationSink,
    ) -> ReconcileOutcome {
        let total = alerts.len();
        let mut new_alerts = Vec::new();
        let mut highest_new = None;
        let mut cue = None;

        if total > self.last_alert_count && monitoring_active {
            new_alerts = alerts
                .iter()
                .filter(|a| a.id.as_ref().is_none_or(|id| !self.seen.contains(id)))
                .cloned()
                .collect();

            if !new_alerts.is_empty() {
                for alert in &new_alerts {
                    if let Some(id) = &alert.id {
                        self.seen.insert(id.clone());
                    }
                    sink.show_toast(Toast::new(
                        ToastLevel::for_severity(alert.severity),
                        format!("{} alert: {}", alert.severity.label(), alert.kind),
                        alert.message.clone(),
                    ));
                }

                let highest = new_alerts
                    .iter()
                    .map(|a| a.severity)
                    .max()
                    .unwrap_or_default();
                highest_new = Some(highest);

                if self.audio_enabled && sink.audio_available() {
                    // A bucket made only of unrecognized severities plays the default cue.
                    let cue_severity = new_alerts
                        .iter()
                        .any(|a| a.severity == highest && a.severity_recognized)
                        .then_some(highest);
                    let selected = AudioCue::for_severity(cue_severity);
                    sink.play_cue(selected);
                    cue = Some(selected);
                }

                sink.show_system_notification(
                    "JARM Alerts",
                    &format!("{} new alert(s), severity {}", new_alerts.len(), highest),
                );

                debug!(count = new_alerts.len(), %highest, "new alerts surfaced");
            }
        }

        self.last_alert_count = total;

        let present: HashSet<&AlertId> = alerts.iter().filter_map(|a| a.id.as_ref()).collect();
        self.seen.retain(|id| present.contains(id));

        let badge = SeverityBadge::from_alerts(&alerts);
        self.alerts_cache = alerts;

        ReconcileOutcome {
            total,
            new_alerts,
            highest_new,
            cue,
            badge,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sink::RecordingSink;

    fn alert(id: &str, severity: Severity) -> Alert {
        Alert {
            id: Some(AlertId::new(id)),
            kind: "high_cpu".into(),
            severity,
            severity_recognized: true,
            message: format!("alert {id}"),
            source: "system_monitor".into(),
            created_at: None,
        }
    }

    #[test]
    fn empty_snapshot_is_all_clear() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);

        let outcome = rec.reconcile(Vec::new(), true, &sink);
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.badge.label(), "All Clear");
        assert!(sink.events().is_empty());
    }

    #[test]
    fn highest_severity_selects_cue() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);

        let outcome = rec.reconcile(
            vec![
                alert("1", Severity::Medium),
                alert("2", Severity::Critical),
                alert("3", Severity::Low),
            ],
            true,
            &sink,
        );

        assert_eq!(outcome.highest_new, Some(Severity::Critical));
        assert_eq!(outcome.cue, Some(AudioCue::Critical));
        assert_eq!(sink.cues(), vec![AudioCue::Critical]);
        assert_eq!(sink.toasts().len(), 3);
        assert_eq!(
            sink.system_notifications(),
            vec![(
                "JARM Alerts".to_owned(),
                "3 new alert(s), severity critical".to_owned()
            )]
        );
        assert_eq!(outcome.badge.label(), "Critical");
    }

    #[test]
    fn same_snapshot_twice_fires_once() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);
        let snapshot = vec![alert("a", Severity::High), alert("b", Severity::Low)];

        rec.reconcile(snapshot.clone(), true, &sink);
        let first = sink.events().len();
        let outcome = rec.reconcile(snapshot, true, &sink);

        assert_eq!(sink.events().len(), first);
        assert!(outcome.new_alerts.is_empty());
        assert_eq!(outcome.badge.label(), "High");
    }

    #[test]
    fn growth_only_fires_for_unseen_ids() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);

        rec.reconcile(vec![alert("a", Severity::Critical)], true, &sink);
        sink.clear();

        let outcome = rec.reconcile(
            vec![alert("a", Severity::Critical), alert("b", Severity::Medium)],
            true,
            &sink,
        );
        assert_eq!(outcome.new_alerts.len(), 1);
        assert_eq!(sink.cues(), vec![AudioCue::Medium]);
        assert_eq!(outcome.badge.label(), "Critical");
    }

    #[test]
    fn pruned_id_fires_again_on_return() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);

        rec.reconcile(vec![alert("A", Severity::High)], true, &sink);
        rec.reconcile(Vec::new(), true, &sink);
        assert!(!rec.is_seen(&AlertId::new("A")));

        rec.reconcile(vec![alert("A", Severity::High)], true, &sink);
        assert_eq!(sink.cues(), vec![AudioCue::High, AudioCue::High]);
    }

    #[test]
    fn inactive_monitoring_suppresses_side_effects_but_tracks_count() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);

        let outcome = rec.reconcile(vec![alert("a", Severity::High)], false, &sink);
        assert!(sink.events().is_empty());
        assert_eq!(rec.last_alert_count(), 1);
        assert_eq!(outcome.badge.label(), "High");

        // Count did not grow, so turning monitoring on does not replay it.
        rec.reconcile(vec![alert("a", Severity::High)], true, &sink);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn audio_suppressed_without_visuals_lost() {
        let muted = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(false);
        let outcome = rec.reconcile(vec![alert("a", Severity::Critical)], true, &muted);
        assert!(outcome.cue.is_none());
        assert!(muted.cues().is_empty());
        assert_eq!(muted.toasts().len(), 1);
        assert_eq!(muted.system_notifications().len(), 1);

        let no_device = RecordingSink::new(false);
        let mut rec = AlertReconciler::new(true);
        rec.reconcile(vec![alert("a", Severity::Critical)], true, &no_device);
        assert!(no_device.cues().is_empty());
        assert_eq!(no_device.toasts().len(), 1);
    }

    #[test]
    fn alerts_without_id_are_not_deduplicated() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);
        let anonymous = Alert {
            id: None,
            ..alert("x", Severity::Medium)
        };

        rec.reconcile(vec![anonymous.clone()], true, &sink);
        assert_eq!(rec.seen_count(), 0);

        rec.reconcile(Vec::new(), true, &sink);
        rec.reconcile(vec![anonymous], true, &sink);
        assert_eq!(sink.cues(), vec![AudioCue::Medium, AudioCue::Medium]);
    }

    #[test]
    fn unrecognized_severity_plays_default_cue() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);
        let warning = Alert {
            severity: Severity::from_wire(Some("warning")),
            severity_recognized: Severity::is_recognized(Some("warning")),
            ..alert("w", Severity::Low)
        };

        let outcome = rec.reconcile(vec![warning], true, &sink);
        assert_eq!(outcome.highest_new, Some(Severity::Low));
        assert_eq!(outcome.cue, Some(AudioCue::Default));
        assert_eq!(sink.cues(), vec![AudioCue::Default]);
    }

    #[test]
    fn recognized_low_beside_unrecognized_plays_low_cue() {
        let sink = RecordingSink::new(true);
        let mut rec = AlertReconciler::new(true);
        let warning = Alert {
            severity_recognized: false,
            ..alert("w", Severity::Low)
        };

        rec.reconcile(vec![warning, alert("l", Severity::Low)], true, &sink);
        assert_eq!(sink.cues(), vec![AudioCue::Low]);
    }
}
