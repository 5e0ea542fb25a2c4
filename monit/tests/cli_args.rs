//! CLI behavior for the monit client binary.
use assert_cmd::prelude::*;
use std::process::Command;

fn output_text(out: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

#[test]
fn help_mentions_short_and_long_flags() {
    let out = Command::cargo_bin("monit")
        .expect("binary exists")
        .arg("--help")
        .output()
        .expect("run monit --help");
    assert!(out.status.success());
    let text = output_text(&out);
    for flag in ["--key", "-k", "--key-file", "-K", "--tls-ca", "-t"] {
        assert!(text.contains(flag), "help missing {flag}\n{text}");
    }
}

#[test]
fn flags_before_help_are_accepted() {
    let out = Command::cargo_bin("monit")
        .expect("binary exists")
        .args(["-k", "abc", "-t", "/tmp/cert.pem", "--help"])
        .output()
        .expect("run monit");
    assert!(out.status.success(), "{}", output_text(&out));
}

#[test]
fn missing_url_fails() {
    let out = Command::cargo_bin("monit")
        .expect("binary exists")
        .args(["-k", "abc"])
        .output()
        .expect("run monit");
    assert!(!out.status.success());
    assert!(output_text(&out).contains("Missing agent URL"));
}

#[test]
fn missing_key_fails_before_connecting() {
    let home = tempfile::tempdir().expect("tempdir");
    let out = Command::cargo_bin("monit")
        .expect("binary exists")
        .env_remove("MONIT_KEY")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .arg("ws://127.0.0.1:9/ws")
        .output()
        .expect("run monit");
    assert!(!out.status.success());
    assert!(output_text(&out).contains("no key given"));
}

#[test]
fn connect_failure_is_reported() {
    // Nothing listens on the discard port, so this fails at connect time,
    // after argument and key handling succeeded.
    let out = Command::cargo_bin("monit")
        .expect("binary exists")
        .args(["-k", "abc", "ws://127.0.0.1:9/ws"])
        .output()
        .expect("run monit");
    assert!(!out.status.success());
    assert!(output_text(&out).contains("connecting to agent"));
}
