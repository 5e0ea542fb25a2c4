//! Scriptable metrics provider shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use monit_agent::metrics::{MetricsProvider, ProviderError};
use monit_agent::types::{CpuTimes, NetCounters, ProcessEntry, SwapMemory, VirtualMemory};

/// Each slot holds the next answer; `None` makes that call fail.
#[derive(Default)]
pub struct FakeProvider {
    pub cpu: Mutex<Option<CpuTimes>>,
    pub memory: Mutex<Option<VirtualMemory>>,
    pub swap: Mutex<Option<SwapMemory>>,
    pub net: Mutex<Option<NetCounters>>,
    pub procs: Mutex<Option<Vec<ProcessEntry>>>,
    pub delay: Mutex<Option<Duration>>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn healthy() -> Self {
        let p = Self::default();
        *p.cpu.lock().unwrap() = Some(cpu(10.0, 30.0));
        *p.memory.lock().unwrap() = Some(memory(8 << 30, 2 << 30));
        *p.swap.lock().unwrap() = Some(swap(1 << 30, 256 << 20));
        *p.net.lock().unwrap() = Some(NetCounters {
            bytes_sent: 1000,
            bytes_recv: 5000,
        });
        *p.procs.lock().unwrap() = Some(processes(5));
        p
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<T: Clone>(&self, slot: &Mutex<Option<T>>, what: &str) -> Result<T, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = *self.delay.lock().unwrap() {
            std::thread::sleep(d);
        }
        slot.lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::Parse(format!("scripted {what} failure")))
    }
}

impl MetricsProvider for FakeProvider {
    fn cpu_times(&self) -> Result<CpuTimes, ProviderError> {
        self.answer(&self.cpu, "cpu")
    }
    fn virtual_memory(&self) -> Result<VirtualMemory, ProviderError> {
        self.answer(&self.memory, "memory")
    }
    fn swap_memory(&self) -> Result<SwapMemory, ProviderError> {
        self.answer(&self.swap, "swap")
    }
    fn net_counters(&self) -> Result<NetCounters, ProviderError> {
        self.answer(&self.net, "network")
    }
    fn processes(&self) -> Result<Vec<ProcessEntry>, ProviderError> {
        self.answer(&self.procs, "processes")
    }
}

pub fn cpu(user: f64, idle: f64) -> CpuTimes {
    CpuTimes {
        user,
        system: 5.0,
        idle,
        nice: 1.0,
        iowait: 2.0,
        irq: 0.5,
        softirq: 0.5,
        steal: 0.0,
        guest: 1.0,
    }
}

pub fn memory(total: u64, used: u64) -> VirtualMemory {
    VirtualMemory {
        total,
        used,
        free: total - used,
        available: total - used,
        active: used / 2,
        buffers: 1 << 20,
        cached: 64 << 20,
        used_percent: used as f64 / total as f64 * 100.0,
    }
}

pub fn swap(total: u64, used: u64) -> SwapMemory {
    SwapMemory {
        total,
        used,
        free: total - used,
        used_percent: used as f64 / total as f64 * 100.0,
    }
}

/// `n` processes with pid i+1 and CPU share i.
pub fn processes(n: u32) -> Vec<ProcessEntry> {
    (0..n)
        .map(|i| ProcessEntry {
            pid: i + 1,
            name: Some(format!("proc{}", i + 1)),
            user: Some("root".into()),
            memory: Some(u64::from(i + 1) * 1024 * 1024),
            cpu_share: f64::from(i),
            start_time: Some(1_700_000_000),
        })
        .collect()
}
