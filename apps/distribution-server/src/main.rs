mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{AppConfig, LogFormat, LoggingConfig};
use distribution_service::DistributionServiceModule;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Parser)]
#[command(name = "distribution-server", version, about = "Music distribution platform API")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config/distribution.yaml")]
    config: PathBuf,

    /// Print the effective configuration (secrets masked) and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Run migrations and serve the HTTP API (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Store default permissions for roles that have none, then exit
    SeedPermissions,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("distribution-server error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&config.redacted())?);
        return Ok(());
    }

    init_tracing(&config.logging)?;
    tracing::info!(config = %cli.config.display(), "configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            let db = connect(&config).await?;
            DistributionServiceModule::new(config.distribution)
                .migrate(&db)
                .await
        }
        Command::SeedPermissions => {
            let db = Arc::new(connect(&config).await?);
            let mut distribution = config.distribution;
            distribution.seed_default_permissions = false;

            let module = DistributionServiceModule::new(distribution);
            module.init(db).await?;
            let seeded = module
                .service()?
                .seed_default_permissions()
                .await
                .map_err(|e| anyhow::anyhow!("seeding role permissions failed: {e}"))?;
            tracing::info!(count = seeded.len(), roles = ?seeded, "seed finished");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let db = Arc::new(connect(&config).await?);

    let module = Arc::new(DistributionServiceModule::new(config.distribution.clone()));
    module.migrate(&db).await?;
    module.init(db).await?;

    let router = module.register_rest(axum::Router::new())?;

    let cancel = CancellationToken::new();
    let background = tokio::spawn(module.clone().serve(cancel.clone()));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "distribution server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .context("HTTP server failed")?;

    cancel.cancel();
    match background.await {
        Ok(result) => result?,
        Err(e) => tracing::warn!(error = %e, "renewal task aborted"),
    }

    tracing::info!("distribution server stopped");
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .context("failed to connect to database")
}

async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
            }
            tracing::info!("shutdown requested");
        }
        _ = cancel.cancelled() => {}
    }
    cancel.cancel();
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
