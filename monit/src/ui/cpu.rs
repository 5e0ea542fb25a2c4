//! CPU time split by category.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
};

use crate::types::ViewModel;
use crate::ui::util::field;

pub fn draw_cpu(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let Some(c) = v.map(|v| &v.sample.cpu) else {
        return;
    };
    let groups = [
        [("user", c.user), ("system", c.system), ("nice", c.nice)],
        [("idle", c.idle), ("iowait", c.iowait), ("irq", c.irq)],
        [("softirq", c.softirq), ("steal", c.steal), ("guest", c.guest)],
    ];
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    for (col, group) in cols.iter().zip(groups) {
        let lines: Vec<_> = group
            .into_iter()
            .map(|(label, pct)| field(label, format!("{pct:.1}%")))
            .collect();
        f.render_widget(Paragraph::new(lines), *col);
    }
}
