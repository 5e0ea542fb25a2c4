//! Entry point for monit_agent. Parses settings, loads the allow-list, and
//! serves the dashboard endpoint over plain or TLS WebSocket.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use monit_agent::config::{load_allow_list, parse_args, CliAction, USAGE};
use monit_agent::gatekeeper::Gatekeeper;
use monit_agent::metrics::SysinfoProvider;
use monit_agent::sampler::Sampler;
use monit_agent::state::AppState;
use monit_agent::supervisor::Supervisor;
use monit_agent::{tls, ws};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = match parse_args(std::env::args(), |k| std::env::var(k).ok())? {
        CliAction::Run(s) => s,
        CliAction::Help => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    let allow = load_allow_list(&settings.authorized_path)?;
    if allow.is_empty() {
        warn!(
            path = %settings.authorized_path.display(),
            "allow-list is empty; every connection will be refused"
        );
    }

    let hostname = hostname::get()
        .ok()
        .and_then(|s| s.into_string().ok())
        .unwrap_or_else(|| "unknown".into());

    let sampler = Arc::new(Sampler::new(
        Arc::new(SysinfoProvider::with_process_refresh(settings.tick)),
        settings.process_rows,
    ));
    let state = AppState::new(
        Gatekeeper::new(Arc::new(allow.clone())),
        Supervisor::new(sampler, settings.tick, hostname),
    );
    let app = ws::router(state);

    let ip: IpAddr = settings
        .host
        .parse()
        .with_context(|| format!("invalid bind address {}", settings.host))?;
    let addr = SocketAddr::new(ip, settings.port);

    info!(
        %addr,
        tls = settings.enable_ssl,
        identities = allow.len(),
        tick_ms = settings.tick.as_millis() as u64,
        rows = settings.process_rows,
        "monit agent starting"
    );

    if settings.enable_ssl {
        let (cert, key) = tls::ensure_self_signed_cert()?;
        let config = RustlsConfig::from_pem_file(cert, key).await?;
        axum_server::bind_rustls(addr, config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
    }
    Ok(())
}
