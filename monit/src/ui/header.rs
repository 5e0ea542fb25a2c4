//! Title line, usage gauges, and the footer key hints.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};

use crate::types::{Focus, ViewModel};
use crate::ui::theme::{HIGHLIGHT, SECONDARY};
use crate::ui::util::usage_color;

pub fn draw_title(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let mut spans = vec![Span::styled(
        "Monit.",
        Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
    )];
    match v {
        Some(v) => {
            spans.push(Span::raw(format!("  {}", v.host)));
            spans.push(Span::styled(
                format!("  as {}", v.identity),
                Style::default().fg(SECONDARY),
            ));
        }
        None => spans.push(Span::styled("  connecting...", Style::default().fg(SECONDARY))),
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// CPU busy, memory and swap as one-row gauges side by side.
pub fn draw_gauges(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .spacing(1)
        .split(area);
    let (cpu, mem, swap) = v
        .map(|v| {
            (
                v.sample.cpu.busy,
                v.sample.memory.used_percent,
                v.sample.swap.used_percent,
            )
        })
        .unwrap_or_default();
    for (col, (label, pct)) in cols.iter().zip([("CPU", cpu), ("MEM", mem), ("SWP", swap)]) {
        let ratio = (pct / 100.0).clamp(0.0, 1.0);
        let g = Gauge::default()
            .gauge_style(Style::default().fg(usage_color(pct)))
            .ratio(if ratio.is_finite() { ratio } else { 0.0 })
            .label(format!("{label} {pct:.1}%"));
        f.render_widget(g, *col);
    }
}

pub fn draw_footer(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let hint = match v.map(|v| v.focus) {
        Some(Focus::TableFocused) => "↑/k ↓/j move  esc leave table  q quit",
        _ => "esc select processes  q quit",
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(SECONDARY)),
        area,
    );
}
