//! Wire types shared with the agent: the view model it pushes and the
//! messages this client sends back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Active,
    TableFocused,
}

// The agent also sends the session's width and height; the client draws to
// its own frame, so they are not mirrored.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewModel {
    pub host: String,
    pub identity: String,
    pub focus: Focus,
    pub selected: Option<usize>,
    pub visible_rows: usize,
    pub sample: SampleView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Size {
    pub value: String,
    pub unit: String,
}

impl Size {
    pub fn label(&self) -> String {
        format!("{} {}", self.value, self.unit)
    }
}

#[derive(Debug, Clone, Deserialize)]
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

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryView {
    pub used_percent: f64,
    pub total: Size,
    pub used: Size,
    pub available: Size,
    pub active: Size,
    pub buffers: Size,
    pub cached: Size,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapView {
    pub used_percent: f64,
    pub total: Size,
    pub used: Size,
    pub free: Size,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkView {
    pub up: Size,
    pub down: Size,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessView {
    pub pid: u32,
    pub name: String,
    pub cpu: String,
    pub memory: String,
    pub user: String,
    pub uptime: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleView {
    pub cpu: CpuView,
    pub memory: MemoryView,
    pub swap: SwapView,
    pub network: NetworkView,
    pub processes: Vec<ProcessView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Resize { width: u16, height: u16 },
    Key { key: String },
}
