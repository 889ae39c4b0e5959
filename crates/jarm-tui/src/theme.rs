//! Palette and semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use jarm_core::{Severity, ToastLevel};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(96, 165, 250); // #60a5fa
pub const TEXT: Color = Color::Rgb(203, 213, 225); // #cbd5e1
pub const MUTED: Color = Color::Rgb(100, 116, 139); // #64748b
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 41, 59); // #1e293b

// Severity colors match the web dashboard's gauge thresholds.
pub const CRITICAL: Color = Color::Rgb(220, 38, 38); // #dc2626
pub const HIGH: Color = Color::Rgb(234, 88, 12); // #ea580c
pub const MEDIUM: Color = Color::Rgb(245, 158, 11); // #f59e0b
pub const LOW: Color = Color::Rgb(16, 185, 129); // #10b981

pub const CPU_SERIES: Color = Color::Rgb(239, 68, 68); // #ef4444
pub const MEMORY_SERIES: Color = Color::Rgb(59, 130, 246); // #3b82f6
pub const PROCESS_SERIES: Color = Color::Rgb(16, 185, 129); // #10b981

pub fn severity(level: Severity) -> Color {
    match level {
        Severity::Critical => CRITICAL,
        Severity::High => HIGH,
        Severity::Medium => MEDIUM,
        Severity::Low => LOW,
    }
}

pub fn toast(level: ToastLevel) -> Color {
    match level {
        ToastLevel::Error => CRITICAL,
        ToastLevel::Warning => MEDIUM,
        ToastLevel::Success => LOW,
        ToastLevel::Info => ACCENT,
    }
}

/// Parse a `#rrggbb` color from backend chart data. Anything else falls
/// back to the muted gray.
pub fn hex(raw: &str) -> Color {
    let digits = raw.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return MUTED;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => MUTED,
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_backend_hex_colors() {
        assert_eq!(hex("#dc2626"), CRITICAL);
        assert_eq!(hex("10b981"), LOW);
    }

    #[test]
    fn malformed_hex_is_muted() {
        assert_eq!(hex("#zzzzzz"), MUTED);
        assert_eq!(hex("red"), MUTED);
        assert_eq!(hex("#ääää"), MUTED);
    }
}
