//! Display helpers: byte magnitudes, uptimes, percentages.

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Split a byte count into a value string and its binary unit.
pub fn bytes(b: u64) -> (String, &'static str) {
    match b {
        b if b >= GB => (format!("{:.2}", b as f64 / GB as f64), "GB"),
        b if b >= MB => (format!("{:.2}", b as f64 / MB as f64), "MB"),
        b if b >= KB => (format!("{:.2}", b as f64 / KB as f64), "KB"),
        b => (b.to_string(), "B"),
    }
}

pub fn bytes_label(b: u64) -> String {
    let (value, unit) = bytes(b);
    format!("{value} {unit}")
}

/// Whole-second duration in `2h0m7s` form.
pub fn uptime(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

pub fn percent(v: f64) -> String {
    format!("{v:.2}%")
}

/// Round to one decimal for the CPU/memory panels.
pub fn tenth(v: f64) -> f64 {
    if v.is_finite() {
        (v * 10.0).round() / 10.0
    } else {
        0.0
    }
}
