//! Small UI helpers: truncation, usage coloring, label/value lines.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::ui::theme::{PRIMARY, SECONDARY};

/// Cut to `max` characters, ending in `…` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

pub fn usage_color(pct: f64) -> Color {
    match pct {
        x if x < 25.0 => Color::Green,
        x if x < 60.0 => Color::Yellow,
        _ => Color::Red,
    }
}

/// `label value` with the label dimmed.
pub fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(SECONDARY)),
        Span::styled(value, Style::default().fg(PRIMARY)),
    ])
}
