//! Swap totals.

use ratatui::{layout::Rect, widgets::Paragraph};

use crate::types::ViewModel;
use crate::ui::util::field;

pub fn draw_swap(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let Some(s) = v.map(|v| &v.sample.swap) else {
        return;
    };
    let lines = vec![
        field("swap", s.total.label()),
        field("used", s.used.label()),
        field("free", s.free.label()),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
