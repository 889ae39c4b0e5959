//! Key bindings. Every state change starts as an [`Action`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use jarm_core::{ChartKind, NavAction};

/// History windows offered by `+`/`-`, in hours.
pub const HISTORY_WINDOWS: [u32; 7] = [1, 6, 12, 24, 48, 72, 168];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    PageAlerts(NavAction),
    PageNotifications(NavAction),
    SelectNext,
    SelectPrev,
    MarkSelectedRead,
    MarkAllRead,
    SelectChart(ChartKind),
    WidenHistory,
    NarrowHistory,
    ToggleChartAutoRefresh,
    StartMonitoring,
    StopMonitoring,
}

impl Action {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(key.code, KeyCode::Char('c')).then_some(Self::Quit);
        }
        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            KeyCode::Char(']') => Self::PageAlerts(NavAction::Next),
            KeyCode::Char('[') => Self::PageAlerts(NavAction::Prev),
            KeyCode::Char('}') => Self::PageNotifications(NavAction::Next),
            KeyCode::Char('{') => Self::PageNotifications(NavAction::Prev),
            KeyCode::Down | KeyCode::Char('j') => Self::SelectNext,
            KeyCode::Up | KeyCode::Char('k') => Self::SelectPrev,
            KeyCode::Char('r') => Self::MarkSelectedRead,
            KeyCode::Char('R') => Self::MarkAllRead,
            KeyCode::Char('1') => Self::SelectChart(ChartKind::Bar),
            KeyCode::Char('2') => Self::SelectChart(ChartKind::Gauge),
            KeyCode::Char('3') => Self::SelectChart(ChartKind::Pie),
            KeyCode::Char('4') => Self::SelectChart(ChartKind::Line),
            KeyCode::Char('+' | '=') => Self::WidenHistory,
            KeyCode::Char('-') => Self::NarrowHistory,
            KeyCode::Char('a') => Self::ToggleChartAutoRefresh,
            KeyCode::Char('s') => Self::StartMonitoring,
            KeyCode::Char('x') => Self::StopMonitoring,
            _ => return None,
        };
        Some(action)
    }
}

/// Next preset window strictly wider (or narrower) than `hours`, clamped at
/// the ends.
pub fn step_history(hours: u32, wider: bool) -> u32 {
    if wider {
        HISTORY_WINDOWS
            .iter()
            .copied()
            .find(|&h| h > hours)
            .unwrap_or(HISTORY_WINDOWS[HISTORY_WINDOWS.len() - 1])
    } else {
        HISTORY_WINDOWS
            .iter()
            .rev()
            .copied()
            .find(|&h| h < hours)
            .unwrap_or(HISTORY_WINDOWS[0])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn bracket_keys_page_lists() {
        assert_eq!(
            Action::from_key(key(KeyCode::Char(']'))),
            Some(Action::PageAlerts(NavAction::Next))
        );
        assert_eq!(
            Action::from_key(key(KeyCode::Char('{'))),
            Some(Action::PageNotifications(NavAction::Prev))
        );
    }

    #[test]
    fn number_keys_select_charts() {
        assert_eq!(
            Action::from_key(key(KeyCode::Char('4'))),
            Some(Action::SelectChart(ChartKind::Line))
        );
        assert_eq!(Action::from_key(key(KeyCode::Char('5'))), None);
    }

    #[test]
    fn ctrl_c_quits_but_ctrl_r_does_nothing() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(Action::from_key(ctrl('c')), Some(Action::Quit));
        assert_eq!(Action::from_key(ctrl('r')), None);
    }

    #[test]
    fn history_steps_through_presets() {
        assert_eq!(step_history(24, true), 48);
        assert_eq!(step_history(24, false), 12);
        assert_eq!(step_history(168, true), 168);
        assert_eq!(step_history(1, false), 1);
        // Off-preset values snap to the neighbour.
        assert_eq!(step_history(30, true), 48);
        assert_eq!(step_history(30, false), 24);
    }
}
