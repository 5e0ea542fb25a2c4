//! App state and main loop: forwards input to the agent and redraws on every view.

use std::io;

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio_tungstenite::tungstenite::Message;

use crate::types::{ClientMessage, ViewModel};
use crate::ui::{
    cpu::draw_cpu,
    header::{draw_footer, draw_gauges, draw_title},
    mem::{draw_mem, draw_mem_cache},
    net::draw_net,
    processes::draw_top_processes,
    swap::draw_swap,
};
use crate::ws::{parse_view, send, WsStream};

/// Key names the agent understands. Everything else stays local.
pub fn key_name(k: &KeyEvent) -> Option<&'static str> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    match k.code {
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some("ctrl+c"),
        KeyCode::Char('q') => Some("q"),
        KeyCode::Esc => Some("esc"),
        KeyCode::Up => Some("up"),
        KeyCode::Down => Some("down"),
        KeyCode::Char('k') => Some("k"),
        KeyCode::Char('j') => Some("j"),
        _ => None,
    }
}

#[derive(Default)]
pub struct App {
    // Latest view pushed by the agent
    last_view: Option<ViewModel>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run(&mut self, ws: WsStream) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal, ws).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        ws: WsStream,
    ) -> anyhow::Result<()> {
        let (mut sink, mut stream) = ws.split();
        let mut input = EventStream::new();
        terminal.draw(|f| self.draw(f))?;

        loop {
            tokio::select! {
                ev = input.next() => match ev {
                    Some(Ok(Event::Key(k))) => {
                        if let Some(name) = key_name(&k) {
                            send(&mut sink, &ClientMessage::Key { key: name.into() }).await?;
                        }
                    }
                    Some(Ok(Event::Resize(width, height))) => {
                        send(&mut sink, &ClientMessage::Resize { width, height }).await?;
                        terminal.draw(|f| self.draw(f))?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                msg = stream.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(v) = parse_view(&text) {
                            self.last_view = Some(v);
                            terminal.draw(|f| self.draw(f))?;
                        }
                    }
                    // Agent ended the session (quit) or went away.
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                },
            }
        }
        Ok(())
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let v = self.last_view.as_ref();

        // Header strip (title, gauges, detail columns), table, footer.
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // gauges
                Constraint::Length(3), // detail columns
                Constraint::Min(3),    // processes
                Constraint::Length(1), // footer
            ])
            .split(f.area());

        draw_title(f, rows[0], v);
        draw_gauges(f, rows[1], v);

        let details = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40), // cpu categories
                Constraint::Percentage(15), // memory
                Constraint::Percentage(15), // active/buffers/cached
                Constraint::Percentage(15), // swap
                Constraint::Percentage(15), // network
            ])
            .split(rows[2]);
        draw_cpu(f, details[0], v);
        draw_mem(f, details[1], v);
        draw_mem_cache(f, details[2], v);
        draw_swap(f, details[3], v);
        draw_net(f, details[4], v);

        draw_top_processes(f, rows[3], v);
        draw_footer(f, rows[4], v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    const VIEW: &str = r#"{
        "host":"box","identity":"alice","width":100,"height":20,
        "focus":"table_focused","selected":1,"visible_rows":11,
        "sample":{
            "cpu":{"busy":42.0,"user":20.0,"system":10.0,"idle":58.0,"nice":1.0,
                   "iowait":4.0,"irq":1.0,"softirq":1.0,"steal":0.0,"guest":0.0},
            "memory":{"used_percent":25.0,
                "total":{"value":"8.00","unit":"GB"},"used":{"value":"2.00","unit":"GB"},
                "available":{"value":"6.00","unit":"GB"},"active":{"value":"1.00","unit":"GB"},
                "buffers":{"value":"100.00","unit":"MB"},"cached":{"value":"3.00","unit":"GB"}},
            "swap":{"used_percent":0.0,"total":{"value":"0","unit":"B"},
                "used":{"value":"0","unit":"B"},"free":{"value":"0","unit":"B"}},
            "network":{"up":{"value":"1.00","unit":"KB"},"down":{"value":"512","unit":"B"}},
            "processes":[
                {"pid":10,"name":"postgres","cpu":"50.00%","memory":"1.50 GB","user":"pg","uptime":"3m5s"},
                {"pid":20,"name":"nginx","cpu":"5.00%","memory":"20.00 MB","user":"www","uptime":"42s"}
            ]
        }
    }"#;

    fn screen(app: &App) -> String {
        let mut term = Terminal::new(TestBackend::new(100, 20)).unwrap();
        term.draw(|f| app.draw(f)).unwrap();
        let buf = term.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn keys_map_to_agent_names() {
        let press = |code, mods| KeyEvent::new(code, mods);
        assert_eq!(key_name(&press(KeyCode::Char('q'), KeyModifiers::NONE)), Some("q"));
        assert_eq!(
            key_name(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some("ctrl+c")
        );
        assert_eq!(key_name(&press(KeyCode::Esc, KeyModifiers::NONE)), Some("esc"));
        assert_eq!(key_name(&press(KeyCode::Down, KeyModifiers::NONE)), Some("down"));
        assert_eq!(key_name(&press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn draws_placeholder_before_first_view() {
        let s = screen(&App::new());
        assert!(s.contains("Monit."));
        assert!(s.contains("connecting..."));
        assert!(s.contains("PID"));
    }

    #[test]
    fn draws_view() {
        let app = App {
            last_view: parse_view(VIEW),
        };
        let s = screen(&app);
        assert!(s.contains("box"));
        assert!(s.contains("postgres"));
        assert!(s.contains("50.00%"));
        assert!(s.contains("3m5s"));
        assert!(s.contains("leave table"));
    }

    #[test]
    fn highlight_only_with_table_focus() {
        use crate::types::Focus;
        use crate::ui::processes::highlighted;

        let mut v = parse_view(VIEW).unwrap();
        assert_eq!(highlighted(&v), Some(1));
        v.focus = Focus::Active;
        assert_eq!(highlighted(&v), None);
    }
}
