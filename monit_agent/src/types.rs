//! Raw provider reads, the derived sample, and the client wire messages.
//! Raw types are what the provider hands us; `Sample` is what sessions keep.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Cumulative CPU time per category, in seconds since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuTimes {
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

impl CpuTimes {
    pub fn total(&self) -> f64 {
        self.user
            + self.system
            + self.idle
            + self.nice
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualMemory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub available: u64,
    pub active: u64,
    pub buffers: u64,
    pub cached: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwapMemory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

/// Cumulative bytes across all interfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// One enumerated process. `None` fields are metadata lookups that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: Option<String>,
    pub user: Option<String>,
    pub memory: Option<u64>,
    pub cpu_share: f64,
    /// Unix seconds.
    pub start_time: Option<u64>,
}

/// What one tick managed to read. A `None` field is a read that failed.
#[derive(Debug, Clone, Default)]
pub struct RawSnapshot {
    pub cpu: Option<CpuTimes>,
    pub memory: Option<VirtualMemory>,
    pub swap: Option<SwapMemory>,
    pub network: Option<(NetCounters, Instant)>,
    pub processes: Option<Vec<ProcessEntry>>,
}

/// Network counters from the last successful read, kept per session.
#[derive(Debug, Clone, Copy)]
pub struct NetBaseline {
    pub counters: NetCounters,
    pub at: Instant,
}

/// Share of total CPU time per category, 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuPercent {
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

impl CpuPercent {
    pub fn sum(&self) -> f64 {
        self.user
            + self.system
            + self.idle
            + self.nice
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
    }

    /// Everything but idle. Zero for an empty read rather than 100.
    pub fn busy(&self) -> f64 {
        if self.sum() <= 0.0 {
            0.0
        } else {
            (100.0 - self.idle).clamp(0.0, 100.0)
        }
    }
}

/// Bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetRate {
    pub upload: f64,
    pub download: f64,
}

/// A ranked process with its display fields already formatted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub user: String,
    pub memory_bytes: u64,
    pub cpu_share: f64,
    pub cpu: String,
    pub memory: String,
    pub uptime: String,
}

/// Derived metrics for one tick. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub cpu: CpuPercent,
    pub memory: VirtualMemory,
    pub swap: SwapMemory,
    pub network: NetRate,
    pub processes: Vec<ProcessRow>,
}

/// Messages the terminal client sends to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Resize { width: u16, height: u16 },
    Key { key: String },
}
