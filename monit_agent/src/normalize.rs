//! Turn raw cumulative counters into percentages and rates.
//! Everything here is pure: same inputs, same outputs.

use crate::types::{CpuPercent, CpuTimes, NetCounters, NetRate};

/// Share of each category in one cumulative read. Not a rate across ticks.
pub fn cpu_percent(t: &CpuTimes) -> CpuPercent {
    let total = t.total();
    if !total.is_finite() || total <= 0.0 {
        return CpuPercent::default();
    }
    let pct = |v: f64| v / total * 100.0;
    CpuPercent {
        user: pct(t.user),
        system: pct(t.system),
        idle: pct(t.idle),
        nice: pct(t.nice),
        iowait: pct(t.iowait),
        irq: pct(t.irq),
        softirq: pct(t.softirq),
        steal: pct(t.steal),
        guest: pct(t.guest),
    }
}

pub fn used_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// Bytes/second between two cumulative reads. Zero without a previous read,
/// with a non-positive interval, or when a counter went backwards.
pub fn net_rate(prev: Option<&NetCounters>, cur: &NetCounters, elapsed_secs: f64) -> NetRate {
    let Some(prev) = prev else {
        return NetRate::default();
    };
    if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return NetRate::default();
    }
    NetRate {
        upload: cur.bytes_sent.saturating_sub(prev.bytes_sent) as f64 / elapsed_secs,
        download: cur.bytes_recv.saturating_sub(prev.bytes_recv) as f64 / elapsed_secs,
    }
}
