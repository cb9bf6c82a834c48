mod broker;
mod error;
mod events;
mod handlers;
mod logging;
mod net;
mod routes;
mod state;
mod store;

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use tokio::time::sleep;
use tower::make::Shared;
use tracing::{error, info, warn};

use crate::state::AppState;

#[derive(Parser)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Name of the server certificate to load for TLS
    #[arg(short, long)]
    domain: Option<String>,

    /// Directory the log file is created in
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,

    /// Only log to the console
    #[arg(long)]
    no_log_file: bool,

    /// Events queued per live listener before further ones are dropped
    #[arg(long, default_value_t = 16)]
    event_buffer: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = leak(Args::parse());

    let log_dir = (!args.no_log_file).then_some(args.log_dir.as_path());
    if let Some(path) = logging::init(log_dir)? {
        info!("logging to {}", path.display());
    }

    let state = leak(AppState::new(args.event_buffer));
    let router = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    match net::outbound_ip().await {
        Ok(ip) => info!("Server running on {ip}:{}", args.port),
        Err(err) => warn!("could not determine outbound address ({err}), listening on {addr}"),
    }

    if let Some(domain) = &args.domain {
        let config = RustlsConfig::from_pem_file(
            format!("/etc/letsencrypt/live/{domain}/fullchain.pem"),
            format!("/etc/letsencrypt/live/{domain}/privkey.pem"),
        )
        .await
        .with_context(|| format!("error loading certificate for {domain}"))?;

        tokio::spawn(reload(config.clone(), domain));
        axum_server::bind_rustls(addr, config)
            .serve(Shared::new(router))
            .await
            .with_context(|| format!("error serving on {addr}"))?;
    } else {
        axum_server::bind(addr)
            .serve(Shared::new(router))
            .await
            .with_context(|| format!("error serving on {addr}"))?;
    }

    Ok(())
}

async fn reload(config: RustlsConfig, domain: &str) {
    loop {
        sleep(Duration::from_secs(100_000)).await;
        info!("reloading rustls configuration");

        if let Err(err) = config
            .reload_from_pem_file(
                format!("/etc/letsencrypt/live/{domain}/fullchain.pem"),
                format!("/etc/letsencrypt/live/{domain}/privkey.pem"),
            )
            .await
        {
            error!("error reloading certificate: {err}");
        }
    }
}

fn leak<T>(val: T) -> &'static T {
    &*Box::leak(Box::new(val))
}
