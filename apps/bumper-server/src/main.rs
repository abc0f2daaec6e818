mod config;
mod logging;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bumper::Bumper;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, CliOverrides, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Bumper Server - road incident reporting backend
#[derive(Parser)]
#[command(name = "bumper-server")]
#[command(about = "Bumper Server - road incident reporting backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use mock database (sqlite::memory:)
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.to_string_lossy());
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (BUMPER__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        port: cli.port,
        verbose: cli.verbose,
        mock: cli.mock,
    });

    logging::init_logging(&config.logging)?;
    tracing::info!("Bumper Server starting");

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    opts.max_connections(cfg.max_conns)
        .connect_timeout(cfg.connect_timeout)
        .sqlx_logging(false);
    if cfg.max_conns == 1 {
        opts.min_connections(1);
    }

    tracing::info!(
        backend = cfg.backend(),
        max_conns = cfg.max_conns,
        "Connecting to database"
    );
    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {} database", cfg.backend()))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let instance_id = uuid::Uuid::new_v4();
    tracing::info!(instance_id = %instance_id, "Generated process instance ID");

    let cancel = CancellationToken::new();
    let cancel_for_signals = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = server::wait_for_shutdown().await {
            tracing::warn!(
                error = %e,
                "shutdown: signal waiter failed, falling back to ctrl_c()"
            );
            let _ = tokio::signal::ctrl_c().await;
        }
        cancel_for_signals.cancel();
    });

    let db = connect(&config.database).await?;
    Bumper::migrate(&db).await?;
    let bumper = Bumper::init(db, &config.bumper)?;

    let router = server::apply_middleware(bumper.router(), &config.server);
    server::serve(router, config.server.bind_addr, cancel).await?;

    tracing::info!("Bumper Server stopped");
    Ok(())
}
