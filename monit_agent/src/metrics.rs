//! Metrics provider: the fallible, per-call source of raw host counters.
//! `SysinfoProvider` reads the live host via sysinfo (plus /proc on Linux).
//! Sessions share one provider, so nothing in it is tied to a session.

use std::sync::{Mutex, RwLock, TryLockError};
use std::time::{Duration, Instant};

use sysinfo::{
    CpuRefreshKind, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessesToUpdate,
    RefreshKind, System, UpdateKind, Users,
};
#[cfg(target_os = "linux")]
use std::fs;

use crate::normalize::used_percent;
use crate::types::{CpuTimes, NetCounters, ProcessEntry, SwapMemory, VirtualMemory};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected format: {0}")]
    Parse(String),
    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),
    #[error("provider state poisoned by an earlier panic")]
    Poisoned,
}

/// Five independent reads. Each call stands alone and may fail on its own;
/// implementations must tolerate concurrent calls from many sessions.
pub trait MetricsProvider: Send + Sync {
    fn cpu_times(&self) -> Result<CpuTimes, ProviderError>;
    fn virtual_memory(&self) -> Result<VirtualMemory, ProviderError>;
    fn swap_memory(&self) -> Result<SwapMemory, ProviderError>;
    fn net_counters(&self) -> Result<NetCounters, ProviderError>;
    fn processes(&self) -> Result<Vec<ProcessEntry>, ProviderError>;
}

/// How often the process table may be re-enumerated by default.
pub const DEFAULT_PROCESS_REFRESH: Duration = Duration::from_secs(1);

pub struct SysinfoProvider {
    // One handle per metric family, so a slow read never holds up another.
    memory: Mutex<System>,
    swap: Mutex<System>,
    networks: Mutex<Networks>,
    table: Mutex<ProcessTable>,
    // Last enumeration, shared by every session until it ages out.
    latest: RwLock<Option<ProcessSnapshot>>,
    refresh_every: Duration,
    cores: usize,
}

struct ProcessTable {
    // Kept across refreshes so per-process CPU usage has a baseline.
    sys: System,
    users: Users,
}

struct ProcessSnapshot {
    at: Instant,
    entries: Vec<ProcessEntry>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        Self::with_process_refresh(DEFAULT_PROCESS_REFRESH)
    }

    /// `refresh_every` bounds how often processes are re-enumerated; calls
    /// in between get the previous enumeration, so every session sees CPU
    /// shares measured over the same window.
    pub fn with_process_refresh(refresh_every: Duration) -> Self {
        let memory = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        let swap = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_swap()),
        );
        let procs = System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
        let cores = match procs.cpus().len() {
            0 => std::thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        };
        Self {
            memory: Mutex::new(memory),
            swap: Mutex::new(swap),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            table: Mutex::new(ProcessTable {
                sys: procs,
                users: Users::new_with_refreshed_list(),
            }),
            latest: RwLock::new(None),
            refresh_every,
            cores,
        }
    }

    /// The last enumeration, if any; `fresh_only` rejects one older than
    /// the refresh interval.
    fn cached(&self, fresh_only: bool) -> Result<Option<Vec<ProcessEntry>>, ProviderError> {
        let latest = self.latest.read().map_err(|_| ProviderError::Poisoned)?;
        Ok(latest
            .as_ref()
            .filter(|snap| !fresh_only || snap.at.elapsed() < self.refresh_every)
            .map(|snap| snap.entries.clone()))
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable {
    fn enumerate(&mut self, cores: f64) -> Vec<ProcessEntry> {
        let kind = ProcessRefreshKind::nothing()
            .with_cpu()
            .with_memory()
            .with_user(UpdateKind::OnlyIfNotSet);
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, kind);
        self.users.refresh();

        let users = &self.users;
        self.sys
            .processes()
            .values()
            .map(|p| {
                let name = p.name().to_string_lossy().into_owned();
                let user = p
                    .user_id()
                    .and_then(|uid| users.get_user_by_id(uid))
                    .map(|u| u.name().to_string());
                let start = p.start_time();
                ProcessEntry {
                    pid: p.pid().as_u32(),
                    name: (!name.is_empty()).then_some(name),
                    user,
                    memory: Some(p.memory()),
                    cpu_share: (f64::from(p.cpu_usage()) / cores).clamp(0.0, 100.0),
                    start_time: (start > 0).then_some(start),
                }
            })
            .collect()
    }
}

impl MetricsProvider for SysinfoProvider {
    #[cfg(target_os = "linux")]
    fn cpu_times(&self) -> Result<CpuTimes, ProviderError> {
        let s = fs::read_to_string("/proc/stat")?;
        parse_proc_stat(&s)
    }

    #[cfg(not(target_os = "linux"))]
    fn cpu_times(&self) -> Result<CpuTimes, ProviderError> {
        Err(ProviderError::Unsupported("cpu time counters"))
    }

    fn virtual_memory(&self) -> Result<VirtualMemory, ProviderError> {
        let (total, used, free, available) = {
            let mut sys = self.memory.lock().map_err(|_| ProviderError::Poisoned)?;
            sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());
            (
                sys.total_memory(),
                sys.used_memory(),
                sys.free_memory(),
                sys.available_memory(),
            )
        };
        let (active, buffers, cached) = meminfo_extras()?;
        Ok(VirtualMemory {
            total,
            used,
            free,
            available,
            active,
            buffers,
            cached,
            used_percent: used_percent(used, total),
        })
    }

    fn swap_memory(&self) -> Result<SwapMemory, ProviderError> {
        let mut sys = self.swap.lock().map_err(|_| ProviderError::Poisoned)?;
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_swap());
        let (total, used, free) = (sys.total_swap(), sys.used_swap(), sys.free_swap());
        Ok(SwapMemory {
            total,
            used,
            free,
            used_percent: used_percent(used, total),
        })
    }

    fn net_counters(&self) -> Result<NetCounters, ProviderError> {
        let mut nets = self.networks.lock().map_err(|_| ProviderError::Poisoned)?;
        nets.refresh(true);
        let (sent, recv) = nets.iter().fold((0u64, 0u64), |(tx, rx), (_, data)| {
            (
                tx.saturating_add(data.total_transmitted()),
                rx.saturating_add(data.total_received()),
            )
        });
        Ok(NetCounters {
            bytes_sent: sent,
            bytes_recv: recv,
        })
    }

    fn processes(&self) -> Result<Vec<ProcessEntry>, ProviderError> {
        if let Some(entries) = self.cached(true)? {
            return Ok(entries);
        }
        let mut table = match self.table.try_lock() {
            Ok(table) => table,
            // Someone else is enumerating: hand out the previous table rather
            // than queue behind them. Only the very first call has to wait.
            Err(TryLockError::WouldBlock) => match self.cached(false)? {
                Some(entries) => return Ok(entries),
                None => self.table.lock().map_err(|_| ProviderError::Poisoned)?,
            },
            Err(TryLockError::Poisoned(_)) => return Err(ProviderError::Poisoned),
        };
        // Refreshed while we waited for the lock.
        if let Some(entries) = self.cached(true)? {
            return Ok(entries);
        }

        let entries = table.enumerate(self.cores as f64);
        let mut latest = self.latest.write().map_err(|_| ProviderError::Poisoned)?;
        *latest = Some(ProcessSnapshot {
            at: Instant::now(),
            entries: entries.clone(),
        });
        Ok(entries)
    }
}

// /proc/stat counts in USER_HZ ticks; 100 on every mainstream Linux build.
#[cfg(target_os = "linux")]
const USER_HZ: f64 = 100.0;

/// Parse the aggregate `cpu` line of /proc/stat into seconds.
#[cfg(target_os = "linux")]
pub fn parse_proc_stat(s: &str) -> Result<CpuTimes, ProviderError> {
    let line = s
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| ProviderError::Parse("no aggregate cpu line".into()))?;
    let mut fields = [0f64; 9];
    for (slot, tok) in fields.iter_mut().zip(line.split_whitespace().skip(1)) {
        let ticks: u64 = tok
            .parse()
            .map_err(|_| ProviderError::Parse(format!("bad cpu field {tok:?}")))?;
        *slot = ticks as f64 / USER_HZ;
    }
    let [user, nice, system, idle, iowait, irq, softirq, steal, guest] = fields;
    Ok(CpuTimes {
        user,
        system,
        idle,
        nice,
        iowait,
        irq,
        softirq,
        steal,
        guest,
    })
}

#[cfg(target_os = "linux")]
fn meminfo_extras() -> Result<(u64, u64, u64), ProviderError> {
    let s = fs::read_to_string("/proc/meminfo")?;
    Ok(parse_meminfo(&s))
}

#[cfg(not(target_os = "linux"))]
fn meminfo_extras() -> Result<(u64, u64, u64), ProviderError> {
    Ok((0, 0, 0))
}

/// Active, buffers and cached in bytes. Missing keys read as 0.
#[cfg(target_os = "linux")]
pub fn parse_meminfo(s: &str) -> (u64, u64, u64) {
    let mut active = 0;
    let mut buffers = 0;
    let mut cached = 0;
    for line in s.lines() {
        let mut it = line.split_whitespace();
        let (Some(key), Some(val)) = (it.next(), it.next()) else {
            continue;
        };
        let Ok(kb) = val.parse::<u64>() else { continue };
        let bytes = kb.saturating_mul(1024);
        match key {
            "Active:" => active = bytes,
            "Buffers:" => buffers = bytes,
            "Cached:" => cached = bytes,
            _ => {}
        }
    }
    (active, buffers, cached)
}
