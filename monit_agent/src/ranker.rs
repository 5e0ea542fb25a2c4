//! Top-N process ranking by CPU share.

use chrono::{DateTime, Utc};

use crate::format;
use crate::types::{ProcessEntry, ProcessRow};

/// Stand-in for a name or owner the provider could not resolve.
pub const UNKNOWN: &str = "Unknown";

/// Sort descending by CPU share (ties: ascending pid), keep the first `limit`,
/// and precompute display fields. Processes with missing metadata are kept.
pub fn rank(mut procs: Vec<ProcessEntry>, limit: usize, now: DateTime<Utc>) -> Vec<ProcessRow> {
    for p in &mut procs {
        if !p.cpu_share.is_finite() || p.cpu_share < 0.0 {
            p.cpu_share = 0.0;
        }
    }
    procs.sort_by(|a, b| {
        b.cpu_share
            .total_cmp(&a.cpu_share)
            .then_with(|| a.pid.cmp(&b.pid))
    });
    procs.truncate(limit);

    let now_secs = u64::try_from(now.timestamp()).unwrap_or(0);
    procs.into_iter().map(|p| row(p, now_secs)).collect()
}

fn row(p: ProcessEntry, now_secs: u64) -> ProcessRow {
    let memory_bytes = p.memory.unwrap_or(0);
    let running = p
        .start_time
        .map(|start| now_secs.saturating_sub(start))
        .unwrap_or(0);
    ProcessRow {
        pid: p.pid,
        name: p
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN.into()),
        user: p
            .user
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| UNKNOWN.into()),
        memory_bytes,
        cpu_share: p.cpu_share,
        cpu: format::percent(p.cpu_share),
        memory: format::bytes_label(memory_bytes),
        uptime: format::uptime(running),
    }
}
