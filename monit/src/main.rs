//! Entry point for the monit TUI. Parses args, resolves the key, and runs the App.

mod app;
mod types;
mod ui;
mod ws;

use app::App;
use std::env;
use std::path::{Path, PathBuf};

const USAGE: &str =
    "[--key KEY|-k KEY] [--key-file PATH|-K PATH] [--tls-ca CERT_PEM|-t CERT_PEM] ws://HOST:PORT/ws";

#[derive(Debug, Default, PartialEq)]
struct ParsedArgs {
    url: Option<String>,
    key: Option<String>,
    key_file: Option<String>,
    tls_ca: Option<String>,
}

enum Parsed {
    Run(ParsedArgs),
    Help(String),
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Parsed, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "monit".into());
    let mut out = ParsedArgs::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Parsed::Help(format!("Usage: {prog} {USAGE}"))),
            "--key" | "-k" => out.key = it.next(),
            "--key-file" | "-K" => out.key_file = it.next(),
            "--tls-ca" | "-t" => out.tls_ca = it.next(),
            _ if arg.starts_with("--key=") => out.key = value_of(&arg),
            _ if arg.starts_with("--key-file=") => out.key_file = value_of(&arg),
            _ if arg.starts_with("--tls-ca=") => out.tls_ca = value_of(&arg),
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown option {arg}. Usage: {prog} {USAGE}"));
            }
            _ => {
                if out.url.is_none() {
                    out.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. Usage: {prog} {USAGE}"));
                }
            }
        }
    }
    Ok(Parsed::Run(out))
}

fn value_of(arg: &str) -> Option<String> {
    arg.split_once('=')
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

fn default_key_file() -> Option<PathBuf> {
    dirs_next::config_dir().map(|d| d.join("monit").join("key"))
}

/// `--key` wins, then `--key-file`, then `MONIT_KEY`, then the default key file.
fn resolve_key(
    args: &ParsedArgs,
    env_key: Option<String>,
    default_file: Option<&Path>,
) -> anyhow::Result<String> {
    if let Some(k) = &args.key {
        return Ok(k.clone());
    }
    if let Some(path) = &args.key_file {
        return read_key(Path::new(path));
    }
    if let Some(k) = env_key.filter(|k| !k.trim().is_empty()) {
        return Ok(k);
    }
    match default_file {
        Some(path) if path.exists() => read_key(path),
        _ => anyhow::bail!("no key given; use --key, --key-file or MONIT_KEY"),
    }
}

fn read_key(path: &Path) -> anyhow::Result<String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading key file {}: {e}", path.display()))?;
    let key = raw.trim().to_string();
    if key.is_empty() {
        anyhow::bail!("key file {} is empty", path.display());
    }
    Ok(key)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = match parse_args(env::args()) {
        Ok(Parsed::Run(p)) => p,
        Ok(Parsed::Help(usage)) => {
            println!("{usage}");
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    let Some(url) = parsed.url.clone() else {
        eprintln!("Missing agent URL. Usage: monit {USAGE}");
        std::process::exit(2);
    };
    let key = resolve_key(
        &parsed,
        env::var("MONIT_KEY").ok(),
        default_key_file().as_deref(),
    )?;

    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let req = ws::build_request(&url, &key, cols, rows)?;
    let ws = ws::connect(req, parsed.tls_ca.as_deref()).await?;

    let mut app = App::new();
    app.run(ws).await
}
