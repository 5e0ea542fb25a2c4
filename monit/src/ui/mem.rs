//! Memory breakdown.

use ratatui::{layout::Rect, widgets::Paragraph};

use crate::types::ViewModel;
use crate::ui::util::field;

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let Some(m) = v.map(|v| &v.sample.memory) else {
        return;
    };
    let lines = vec![
        field("total", m.total.label()),
        field("used", m.used.label()),
        field("avail", m.available.label()),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Active, buffers and cached in their own column.
pub fn draw_mem_cache(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let Some(m) = v.map(|v| &v.sample.memory) else {
        return;
    };
    let lines = vec![
        field("active", m.active.label()),
        field("buffers", m.buffers.label()),
        field("cached", m.cached.label()),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
