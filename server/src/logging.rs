use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "devtrack_server=info,tower_http=info";

fn log_file_name(started: NaiveDateTime) -> String {
    format!("server_{}.log", started.format("%Y-%m-%d_%H:%M:%S"))
}

/// Installs the global subscriber: console output, plus a plain-text copy in
/// a fresh `server_<timestamp>.log` under `log_dir` unless it is `None`.
/// Returns the path of the log file.
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, path) = match log_dir {
        Some(dir) => {
            let path = dir.join(log_file_name(Local::now().naive_local()));
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("error opening log file {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Arc::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("logging was already initialized")?;

    Ok(path)
}
