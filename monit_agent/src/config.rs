//! Process-wide settings: CLI flags over env vars over defaults.
//! Read once at startup and never changed afterwards.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gatekeeper::AllowList;

pub const DEFAULT_PORT: u16 = 23234;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_TICK_MS: u64 = 1000;
pub const DEFAULT_PROCESS_ROWS: usize = 25;
pub const MIN_PROCESS_ROWS: usize = 10;
pub const MAX_PROCESS_ROWS: usize = 40;

pub const USAGE: &str = "Usage: monit_agent [--port N|-p N] [--host ADDR] [--enableSSL] \
[--tick-ms N] [--rows N] [--authorized PATH]";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub enable_ssl: bool,
    pub tick: Duration,
    pub process_rows: usize,
    pub authorized_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Run(Settings),
    Help,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("unexpected argument {0:?}")]
    UnknownArgument(String),
    #[error("cannot read allow-list {}: {source}", path.display())]
    AllowListRead { path: PathBuf, source: io::Error },
    #[error("malformed allow-list {}: {source}", path.display())]
    AllowListFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| Path::new(&h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("monit_agent")
}

pub fn default_authorized_path() -> PathBuf {
    config_dir().join("authorized.json")
}

#[derive(Default)]
struct Raw {
    port: Option<String>,
    host: Option<String>,
    ssl: Option<String>,
    tick_ms: Option<String>,
    rows: Option<String>,
    authorized: Option<String>,
}

/// Parse `args` (program name first) with `env` as the fallback source.
pub fn parse_args<I, E>(args: I, env: E) -> Result<CliAction, ConfigError>
where
    I: IntoIterator<Item = String>,
    E: Fn(&str) -> Option<String>,
{
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut cli = Raw::default();
    while let Some(a) = it.next() {
        match a.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "--port" | "-p" => cli.port = Some(it.next().ok_or(ConfigError::MissingValue("--port"))?),
            "--host" => cli.host = Some(it.next().ok_or(ConfigError::MissingValue("--host"))?),
            "--enableSSL" => cli.ssl = Some("1".into()),
            "--tick-ms" => {
                cli.tick_ms = Some(it.next().ok_or(ConfigError::MissingValue("--tick-ms"))?)
            }
            "--rows" => cli.rows = Some(it.next().ok_or(ConfigError::MissingValue("--rows"))?),
            "--authorized" => {
                cli.authorized = Some(it.next().ok_or(ConfigError::MissingValue("--authorized"))?)
            }
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    cli.port = Some(v.to_string());
                }
            }
            _ => return Err(ConfigError::UnknownArgument(a)),
        }
    }

    let port = match cli.port.or_else(|| env("MONIT_PORT")) {
        Some(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
            name: "port",
            value: v,
        })?,
        None => DEFAULT_PORT,
    };
    let tick_ms = match cli.tick_ms.or_else(|| env("MONIT_TICK_MS")) {
        Some(v) => match v.parse::<u64>() {
            Ok(ms) if ms > 0 => ms,
            _ => {
                return Err(ConfigError::InvalidValue {
                    name: "tick-ms",
                    value: v,
                })
            }
        },
        None => DEFAULT_TICK_MS,
    };
    let process_rows = match cli.rows.or_else(|| env("MONIT_PROCESS_ROWS")) {
        Some(v) => v
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "rows",
                value: v,
            })?
            .clamp(MIN_PROCESS_ROWS, MAX_PROCESS_ROWS),
        None => DEFAULT_PROCESS_ROWS,
    };
    let enable_ssl = cli
        .ssl
        .or_else(|| env("MONIT_ENABLE_SSL"))
        .is_some_and(|v| v != "0" && !v.is_empty());

    Ok(CliAction::Run(Settings {
        host: cli
            .host
            .or_else(|| env("MONIT_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.into()),
        port,
        enable_ssl,
        tick: Duration::from_millis(tick_ms),
        process_rows,
        authorized_path: cli
            .authorized
            .or_else(|| env("MONIT_AUTHORIZED"))
            .map(PathBuf::from)
            .unwrap_or_else(default_authorized_path),
    }))
}

#[derive(Debug, Deserialize)]
struct AllowListFile {
    #[serde(default)]
    identities: BTreeMap<String, String>,
}

/// Load the allow-list. A missing file is an empty list; a broken one is an error.
pub fn load_allow_list(path: &Path) -> Result<AllowList, ConfigError> {
    let data = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AllowList::default()),
        Err(source) => {
            return Err(ConfigError::AllowListRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let file: AllowListFile =
        serde_json::from_str(&data).map_err(|source| ConfigError::AllowListFormat {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(AllowList::new(file.identities))
}
