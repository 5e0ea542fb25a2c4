//! Sampling pipeline: one fan-out of provider reads per tick, merged into a
//! new `Sample` that keeps the last good value for every read that failed.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::metrics::{MetricsProvider, ProviderError};
use crate::normalize;
use crate::ranker;
use crate::types::{NetBaseline, NetRate, RawSnapshot, Sample};

pub struct Sampler {
    provider: Arc<dyn MetricsProvider>,
    process_limit: usize,
}

impl Sampler {
    pub fn new(provider: Arc<dyn MetricsProvider>, process_limit: usize) -> Self {
        Self {
            provider,
            process_limit,
        }
    }

    pub fn process_limit(&self) -> usize {
        self.process_limit
    }

    /// Run all five provider calls concurrently on the blocking pool.
    /// Failures are logged and come back as `None`; nothing is raised.
    pub async fn read(&self) -> RawSnapshot {
        let (cpu, memory, swap, network, processes) = tokio::join!(
            self.call("cpu", |p| p.cpu_times()),
            self.call("memory", |p| p.virtual_memory()),
            self.call("swap", |p| p.swap_memory()),
            self.call("network", |p| p.net_counters().map(|c| (c, Instant::now()))),
            self.call("processes", |p| p.processes()),
        );
        RawSnapshot {
            cpu,
            memory,
            swap,
            network,
            processes,
        }
    }

    /// Read once and merge into `prev`. `baseline` is the calling session's
    /// own network slot.
    pub async fn sample(&self, prev: &Sample, baseline: &mut Option<NetBaseline>) -> Sample {
        let raw = self.read().await;
        merge(prev, raw, baseline, self.process_limit, Utc::now())
    }

    async fn call<T, F>(&self, metric: &'static str, f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MetricsProvider) -> Result<T, ProviderError> + Send + 'static,
    {
        let provider = Arc::clone(&self.provider);
        match tokio::task::spawn_blocking(move || f(provider.as_ref())).await {
            Ok(Ok(v)) => Some(v),
            Ok(Err(e)) => {
                warn!(metric, error = %e, "metric read failed; keeping last value");
                None
            }
            Err(e) => {
                warn!(metric, error = %e, "metric read panicked; keeping last value");
                None
            }
        }
    }
}

/// Build the next sample from whatever this tick read. Each field falls back
/// to `prev` on its own; a tick with no successful read returns `prev` as is.
pub fn merge(
    prev: &Sample,
    raw: RawSnapshot,
    baseline: &mut Option<NetBaseline>,
    process_limit: usize,
    now: DateTime<Utc>,
) -> Sample {
    let network = match raw.network {
        Some((counters, at)) => {
            let rate = match baseline.as_ref() {
                Some(b) => normalize::net_rate(
                    Some(&b.counters),
                    &counters,
                    at.saturating_duration_since(b.at).as_secs_f64(),
                ),
                // First read of the session only seeds the baseline.
                None => NetRate::default(),
            };
            *baseline = Some(NetBaseline { counters, at });
            rate
        }
        None => prev.network,
    };

    Sample {
        cpu: raw.cpu.map_or(prev.cpu, |t| normalize::cpu_percent(&t)),
        // Memory and swap arrive with used-percent already computed.
        memory: raw.memory.unwrap_or(prev.memory),
        swap: raw.swap.unwrap_or(prev.swap),
        network,
        processes: match raw.processes {
            Some(procs) => ranker::rank(procs, process_limit, now),
            None => prev.processes.clone(),
        },
    }
}
