//! The view model sent to the renderer: display-ready, always complete.
//! Keep field names stable; the terminal client mirrors this schema.

use serde::Serialize;

use crate::format;
use crate::session::{Mode, Session};
use crate::types::{CpuPercent, ProcessRow, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Active,
    TableFocused,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub host: String,
    pub identity: String,
    pub width: u16,
    pub height: u16,
    pub focus: Focus,
    pub selected: Option<usize>,
    pub visible_rows: usize,
    pub sample: SampleView,
}

/// A byte magnitude split for right-aligned display, e.g. `("1.50", "MB")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Size {
    pub value: String,
    pub unit: String,
}

impl Size {
    fn of(b: u64) -> Self {
        let (value, unit) = format::bytes(b);
        Self {
            value,
            unit: unit.to_string(),
        }
    }

    fn per_sec(rate: f64) -> Self {
        let b = if rate.is_finite() && rate > 0.0 { rate as u64 } else { 0 };
        Self::of(b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuView {
    pub busy: f64,
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryView {
    pub used_percent: f64,
    pub total: Size,
    pub used: Size,
    pub available: Size,
    pub active: Size,
    pub buffers: Size,
    pub cached: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapView {
    pub used_percent: f64,
    pub total: Size,
    pub used: Size,
    pub free: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkView {
    pub up: Size,
    pub down: Size,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessView {
    pub pid: u32,
    pub name: String,
    pub cpu: String,
    pub memory: String,
    pub user: String,
    pub uptime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleView {
    pub cpu: CpuView,
    pub memory: MemoryView,
    pub swap: SwapView,
    pub network: NetworkView,
    pub processes: Vec<ProcessView>,
}

impl ViewModel {
    pub fn project(session: &Session, host: &str) -> Self {
        let viewport = session.viewport();
        let focus = match session.mode() {
            Mode::TableFocused => Focus::TableFocused,
            Mode::Active | Mode::Terminated => Focus::Active,
        };
        Self {
            host: host.to_string(),
            identity: session.identity().to_string(),
            width: viewport.width,
            height: viewport.height,
            focus,
            selected: session.max_row().map(|max| session.selected().min(max)),
            visible_rows: session.visible_rows(),
            sample: SampleView::from(session.sample()),
        }
    }
}

impl From<&Sample> for SampleView {
    fn from(s: &Sample) -> Self {
        Self {
            cpu: CpuView::from(&s.cpu),
            memory: MemoryView {
                used_percent: format::tenth(s.memory.used_percent),
                total: Size::of(s.memory.total),
                used: Size::of(s.memory.used),
                available: Size::of(s.memory.available),
                active: Size::of(s.memory.active),
                buffers: Size::of(s.memory.buffers),
                cached: Size::of(s.memory.cached),
            },
            swap: SwapView {
                used_percent: format::tenth(s.swap.used_percent),
                total: Size::of(s.swap.total),
                used: Size::of(s.swap.used),
                free: Size::of(s.swap.free),
            },
            network: NetworkView {
                up: Size::per_sec(s.network.upload),
                down: Size::per_sec(s.network.download),
            },
            processes: s.processes.iter().map(ProcessView::from).collect(),
        }
    }
}

impl From<&CpuPercent> for CpuView {
    fn from(c: &CpuPercent) -> Self {
        Self {
            busy: format::tenth(c.busy()),
            user: format::tenth(c.user),
            system: format::tenth(c.system),
            idle: format::tenth(c.idle),
            nice: format::tenth(c.nice),
            iowait: format::tenth(c.iowait),
            irq: format::tenth(c.irq),
            softirq: format::tenth(c.softirq),
            steal: format::tenth(c.steal),
            guest: format::tenth(c.guest),
        }
    }
}

impl From<&ProcessRow> for ProcessView {
    fn from(p: &ProcessRow) -> Self {
        Self {
            pid: p.pid,
            name: p.name.clone(),
            cpu: p.cpu.clone(),
            memory: p.memory.clone(),
            user: p.user.clone(),
            uptime: p.uptime.clone(),
        }
    }
}
