//! Soliloan API server binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use soli_actions::Actions;
use soli_actions::revalidate::NoopRevalidator;
use soli_config::SoliConfig;
use soli_db::service::SoliService;
use soli_http::{AppState, build_router};

#[derive(Debug, Parser)]
#[command(
    name = "soliloan-server",
    version,
    about = "Soliloan loan management API server"
)]
struct Cli {
    /// Explicit config file, layered over env and the usual TOML sources.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8322. Overrides the configured address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Database file path. Overrides the configured path.
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("soliloan-server error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => SoliConfig::load_with_file(path)
            .with_context(|| format!("failed to load config from '{}'", path.display()))?,
        None => SoliConfig::load_with_dotenv().context("failed to load configuration")?,
    };
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    let bind_addr = cli.bind.unwrap_or_else(|| config.server.bind_addr());

    let db_path = config.database.require_path()?.to_string();
    let service = SoliService::new_local(&db_path)
        .await
        .with_context(|| format!("failed to open database at '{db_path}'"))?;

    let actions = Actions::new(service, config, Arc::new(NoopRevalidator));
    let state = AppState::new(Arc::new(actions));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, database = %db_path, "soliloan server listening");

    axum::serve(listener, build_router(state))
        .await
        .context("server exited")?;
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SOLILOAN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
