//! Binary-level argument handling for monit_agent.
use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn help_prints_usage() {
    let out = Command::cargo_bin("monit_agent")
        .expect("binary exists")
        .arg("--help")
        .output()
        .expect("run agent");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--port"), "usage missing: {stdout}");
    assert!(stdout.contains("--authorized"));
}

#[test]
fn unknown_flag_fails() {
    let out = Command::cargo_bin("monit_agent")
        .expect("binary exists")
        .arg("--no-such-flag")
        .output()
        .expect("run agent");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--no-such-flag"));
}

#[test]
fn port_flags_start_the_server() {
    let tmp = tempfile::tempdir().expect("tempdir");
    for flags in [["--port", "0"], ["-p", "0"]] {
        let mut child = Command::cargo_bin("monit_agent")
            .expect("binary exists")
            .env("XDG_CONFIG_HOME", tmp.path())
            .args(["--host", "127.0.0.1"])
            .args(flags)
            .spawn()
            .expect("spawn agent");
        std::thread::sleep(std::time::Duration::from_millis(200));
        // Still running means it parsed and bound.
        assert!(child.try_wait().expect("poll").is_none());
        let _ = child.kill();
        let _ = child.wait();
    }
}
