//! Network throughput since the previous tick.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::types::ViewModel;
use crate::ui::theme::{GREEN, RED, SECONDARY};

pub fn draw_net(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let Some(n) = v.map(|v| &v.sample.network) else {
        return;
    };
    let rate = |arrow: &'static str, color, value: String| {
        Line::from(vec![
            Span::styled(arrow, Style::default().fg(color)),
            Span::raw(format!(" {value}")),
            Span::styled("/s", Style::default().fg(SECONDARY)),
        ])
    };
    let lines = vec![
        rate("↑", GREEN, n.up.label()),
        rate("↓", RED, n.down.label()),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
