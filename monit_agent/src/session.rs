//! Per-connection dashboard state and its key/resize/tick transitions.
//! A `Session` is owned by exactly one task and never shared.

use crate::gatekeeper::Identity;
use crate::sampler::Sampler;
use crate::types::{NetBaseline, Sample};
use crate::view::ViewModel;

/// Fixed rows the dashboard spends outside the process table body:
/// header strip (5), table border (2), table header (1), footer hint (1).
pub const DASHBOARD_CHROME_ROWS: u16 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Active,
    TableFocused,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    ToggleFocus,
    Up,
    Down,
}

impl Key {
    /// Map a client key name. Unrecognized keys are ignored by the caller.
    pub fn parse(name: &str) -> Option<Key> {
        match name {
            "q" | "ctrl+c" => Some(Key::Quit),
            "esc" | "escape" => Some(Key::ToggleFocus),
            "up" | "k" => Some(Key::Up),
            "down" | "j" => Some(Key::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Transport lifecycle events after `Connected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Resized(Viewport),
    KeyPressed(Key),
    Disconnected,
}

pub struct Session {
    identity: Identity,
    viewport: Viewport,
    mode: Mode,
    selected: usize,
    sample: Sample,
    net: Option<NetBaseline>,
    process_limit: usize,
}

impl Session {
    pub fn new(identity: Identity, viewport: Viewport, process_limit: usize) -> Self {
        Self {
            identity,
            viewport,
            mode: Mode::Active,
            selected: 0,
            sample: Sample::default(),
            net: None,
            process_limit,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_terminated(&self) -> bool {
        self.mode == Mode::Terminated
    }

    /// Table rows that fit in the viewport, capped by the row limit.
    pub fn visible_rows(&self) -> usize {
        let fit = self.viewport.height.saturating_sub(DASHBOARD_CHROME_ROWS) as usize;
        fit.min(self.process_limit)
    }

    /// Highest selectable row, `None` when nothing is shown.
    pub fn max_row(&self) -> Option<usize> {
        self.visible_rows()
            .min(self.sample.processes.len())
            .checked_sub(1)
    }

    /// Returns whether the view changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if self.is_terminated() || self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        true
    }

    /// Returns whether the view changed.
    pub fn press(&mut self, key: Key) -> bool {
        match (self.mode, key) {
            (Mode::Terminated, _) => false,
            (_, Key::Quit) => {
                self.mode = Mode::Terminated;
                true
            }
            (Mode::Active, Key::ToggleFocus) => {
                self.mode = Mode::TableFocused;
                true
            }
            (Mode::TableFocused, Key::ToggleFocus) => {
                self.mode = Mode::Active;
                true
            }
            (Mode::TableFocused, Key::Up) => {
                let Some(max) = self.max_row() else {
                    return false;
                };
                let next = self.selected.saturating_sub(1).min(max);
                self.set_selected(next)
            }
            (Mode::TableFocused, Key::Down) => match self.max_row() {
                Some(max) if self.selected < max => self.set_selected(self.selected + 1),
                _ => false,
            },
            (Mode::Active, Key::Up | Key::Down) => false,
        }
    }

    fn set_selected(&mut self, row: usize) -> bool {
        let changed = self.selected != row;
        self.selected = row;
        changed
    }

    /// Sample once and replace the current sample. A terminated session
    /// keeps its state untouched.
    pub async fn tick(&mut self, sampler: &Sampler) {
        if self.is_terminated() {
            return;
        }
        self.sample = sampler.sample(&self.sample, &mut self.net).await;
    }

    pub fn view(&self, host: &str) -> ViewModel {
        ViewModel::project(self, host)
    }
}
