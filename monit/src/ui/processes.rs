//! Top processes table. The agent ranks, trims and formats the rows; this
//! only lays them out and marks the selection.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::types::{Focus, ProcessView, ViewModel};
use crate::ui::theme::{BORDER, HIGHLIGHT, PRIMARY, SECONDARY};
use crate::ui::util::{truncate, usage_color};

const COLS: [Constraint; 6] = [
    Constraint::Length(10), // PID
    Constraint::Length(25), // Name
    Constraint::Length(12), // CPU
    Constraint::Length(12), // MEM
    Constraint::Length(12), // Username
    Constraint::Length(12), // Time
];
const NAME_WIDTH: usize = 24;
const USER_WIDTH: usize = 11;

/// Index of the row to highlight, if any. Only while the table has focus.
pub fn highlighted(v: &ViewModel) -> Option<usize> {
    match v.focus {
        Focus::TableFocused => v.selected,
        Focus::Active => None,
    }
}

pub fn draw_top_processes(f: &mut ratatui::Frame<'_>, area: Rect, v: Option<&ViewModel>) {
    let focused = v.is_some_and(|v| v.focus == Focus::TableFocused);
    let border = if focused { HIGHLIGHT } else { BORDER };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title("Processes");

    let header = Row::new(["PID", "Name", "CPU", "MEM", "Username", "Time"])
        .style(Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = match v {
        Some(v) => {
            let mark = highlighted(v);
            v.sample
                .processes
                .iter()
                .take(v.visible_rows)
                .enumerate()
                .map(|(i, p)| process_row(p, mark == Some(i)))
                .collect()
        }
        None => Vec::new(),
    };

    let table = Table::new(rows, COLS).header(header).block(block);
    f.render_widget(table, area);
}

fn process_row(p: &ProcessView, selected: bool) -> Row<'_> {
    let cpu_pct = p.cpu.trim_end_matches('%').parse::<f64>().unwrap_or(0.0);
    let row = Row::new(vec![
        Cell::from(p.pid.to_string()).style(Style::default().fg(SECONDARY)),
        Cell::from(truncate(&p.name, NAME_WIDTH)),
        Cell::from(p.cpu.as_str()).style(Style::default().fg(usage_color(cpu_pct))),
        Cell::from(p.memory.as_str()),
        Cell::from(truncate(&p.user, USER_WIDTH)),
        Cell::from(p.uptime.as_str()),
    ]);
    if selected {
        row.style(
            Style::default()
                .bg(HIGHLIGHT)
                .fg(PRIMARY)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        row
    }
}
