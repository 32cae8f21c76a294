use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use sysdash::Collector;
use sysdash::config::{Config, InvalidConfig, ServerConfig, read_config, read_config_from_path};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sysdash",
    about = "Serve point-in-time system telemetry as JSON"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(long, env = "SYSDASH_LISTEN")]
    listen: Option<String>,

    /// Log filter directive, e.g. `sysdash=debug` (RUST_LOG takes precedence)
    #[arg(long)]
    log_filter: Option<String>,

    /// Collect one metric, print it as JSON and exit
    #[arg(long, value_name = "KEY")]
    metric: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let (mut config, invalid) = load_config_for_cli(&cli);
    init_tracing(&config.logging.filter);
    if let Some(err) = invalid {
        warn!(path = %err.path.display(), error = %err.source, "invalid config, using defaults");
    }

    let collector = Collector::new(config.collectors.clone())
        .wrap_err("encountered a problem while looking up the current hostname")?;

    if let Some(key) = &cli.metric {
        let snapshot = collector.invoke(key)?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if config.server.production_hostname.as_deref() == Some(collector.hostname()) {
        info!(
            hostname = collector.hostname(),
            "running on production host, debug routes disabled"
        );
        config.server.debug_routes = false;
    }

    serve(collector, &config.server).await
}

/// Invalid config falls back to the defaults. The error is handed back so it
/// can be logged after the subscriber is installed.
fn load_config_for_cli(cli: &Cli) -> (Config, Option<InvalidConfig>) {
    let loaded = match &cli.config {
        Some(path) => read_config_from_path(path),
        None => read_config(),
    };
    let (mut config, invalid) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    if let Some(ref listen) = cli.listen {
        config.server.listen = listen.clone();
    }
    if let Some(ref filter) = cli.log_filter {
        config.logging.filter = filter.clone();
    }

    (config, invalid)
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(collector: Collector, server: &ServerConfig) -> Result<()> {
    let addr: SocketAddr = server
        .listen
        .parse()
        .wrap_err_with(|| format!("invalid listen address `{}`", server.listen))?;

    let app = sysdash::server::router(Arc::new(collector), server.debug_routes);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    info!(%addr, debug_routes = server.debug_routes, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for ctrl-c");
        return;
    }
    info!("shutting down");
}
