//! CPU share and network rate derivation.

use monit_agent::normalize::{cpu_percent, net_rate, used_percent};
use monit_agent::types::{CpuTimes, NetCounters};

fn times(vals: [f64; 9]) -> CpuTimes {
    let [user, system, idle, nice, iowait, irq, softirq, steal, guest] = vals;
    CpuTimes {
        user,
        system,
        idle,
        nice,
        iowait,
        irq,
        softirq,
        steal,
        guest,
    }
}

#[test]
fn cpu_categories_sum_to_hundred() {
    let reads = [
        [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        [123456.78, 2345.6, 9_999_999.0, 12.0, 0.0, 0.1, 0.2, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [3.3, 3.3, 3.3, 3.3, 3.3, 3.3, 3.3, 3.3, 3.3],
    ];
    for r in reads {
        let pct = cpu_percent(&times(r));
        assert!((pct.sum() - 100.0).abs() < 1e-9, "sum was {}", pct.sum());
    }
}

#[test]
fn cpu_share_of_single_read() {
    let pct = cpu_percent(&times([25.0, 25.0, 50.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
    assert_eq!(pct.user, 25.0);
    assert_eq!(pct.system, 25.0);
    assert_eq!(pct.idle, 50.0);
    assert_eq!(pct.busy(), 50.0);
}

#[test]
fn empty_cpu_read_is_all_zero() {
    let pct = cpu_percent(&CpuTimes::default());
    assert_eq!(pct.sum(), 0.0);
    assert_eq!(pct.busy(), 0.0);
    for v in [pct.user, pct.system, pct.idle, pct.guest] {
        assert!(v.is_finite());
    }
}

#[test]
fn first_read_has_zero_rate() {
    let cur = NetCounters {
        bytes_sent: 9_000_000,
        bytes_recv: 7_000_000,
    };
    let r = net_rate(None, &cur, 1.0);
    assert_eq!(r.upload, 0.0);
    assert_eq!(r.download, 0.0);
}

#[test]
fn rate_is_delta_over_elapsed() {
    let prev = NetCounters {
        bytes_sent: 1000,
        bytes_recv: 4000,
    };
    let cur = NetCounters {
        bytes_sent: 2000,
        bytes_recv: 8000,
    };
    let r = net_rate(Some(&prev), &cur, 1.0);
    assert_eq!(r.upload, 1000.0);
    assert_eq!(r.download, 4000.0);

    let r = net_rate(Some(&prev), &cur, 2.0);
    assert_eq!(r.upload, 500.0);
}

#[test]
fn wrapped_counter_clamps_to_zero() {
    let prev = NetCounters {
        bytes_sent: 5000,
        bytes_recv: 5000,
    };
    let cur = NetCounters {
        bytes_sent: 10,
        bytes_recv: 6000,
    };
    let r = net_rate(Some(&prev), &cur, 1.0);
    assert_eq!(r.upload, 0.0);
    assert_eq!(r.download, 1000.0);
}

#[test]
fn non_positive_elapsed_is_zero_rate() {
    let prev = NetCounters::default();
    let cur = NetCounters {
        bytes_sent: 100,
        bytes_recv: 100,
    };
    assert_eq!(net_rate(Some(&prev), &cur, 0.0).upload, 0.0);
    assert_eq!(net_rate(Some(&prev), &cur, -1.0).download, 0.0);
}

#[test]
fn used_percent_handles_empty_total() {
    assert_eq!(used_percent(0, 0), 0.0);
    assert_eq!(used_percent(1, 4), 25.0);
}
