//! Colors and styles for the Seodeck TUI: a dark theme with a green accent.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ToastLevel;

/// Accent color for highlights and focus indicators.
pub const ACCENT: Color = Color::Rgb(46, 204, 138);

/// Primary foreground color for normal text.
pub const FG: Color = Color::Rgb(224, 224, 230);

/// Muted foreground for hints, labels and secondary information.
pub const FG_MUTED: Color = Color::Rgb(168, 168, 175);

pub const BORDER: Color = Color::Rgb(72, 72, 80);
pub const BORDER_FOCUS: Color = ACCENT;

/// Background for selected list rows.
pub const BG_SELECT: Color = Color::Rgb(18, 38, 32);

pub const SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const WARN: Color = Color::Rgb(230, 180, 80);
pub const ERROR: Color = Color::Rgb(220, 96, 110);

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BORDER_FOCUS)
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn title_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(FG)
}

pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

pub fn key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(BG_SELECT).fg(FG).add_modifier(Modifier::BOLD)
}

pub fn toast_style(level: ToastLevel) -> Style {
    let color = match level {
        ToastLevel::Info => ACCENT,
        ToastLevel::Success => SUCCESS,
        ToastLevel::Error => ERROR,
    };
    Style::default().fg(color)
}

/// Color for a backend status string such as `success`, `FAILED` or `not_run`.
pub fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "success" | "excellent" | "good" => SUCCESS,
        "failed" | "poor" | "critical" => ERROR,
        "not_run" | "fair" => WARN,
        _ => FG_MUTED,
    }
}
