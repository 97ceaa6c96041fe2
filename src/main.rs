//! Rule content service.
//!
//! Serves a fixed catalog of rule content, the groups used to classify it and
//! the OpenAPI specification of its own API.
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ request id → trace → timeout → handlers     │
//!                           │                                   │          │
//!                           │                 ┌─────────────────┴───────┐  │
//!                           │                 ▼                         ▼  │
//!                           │        ContentCatalog / GroupSet     codec   │
//!                           │        (loaded once, Arc-shared)   (bincode) │
//!     Client Response       │                 │                         │  │
//!     ◀─────────────────────┼──── envelope (JSON) ◀─────── raw blob ◀───┘  │
//!                           └──────────────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;

use content_service::config::{load_config, ServiceConfig};
use content_service::lifecycle::signals::shutdown_signal;
use content_service::lifecycle::startup::load_content;
use content_service::lifecycle::{bootstrap, Shutdown};
use content_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "content-service", version)]
#[command(about = "Serves rule content, groups and the OpenAPI spec over HTTP", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Load content and print every rule identifier
    PrintRules,
    /// Load groups and print them as JSON
    PrintGroups,
    /// Print the effective configuration as TOML
    PrintConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::PrintRules => {
            let (catalog, _) = load_content(&config)?;
            for id in catalog.rule_ids() {
                println!("{}", id);
            }
            Ok(())
        }
        Commands::PrintGroups => {
            let (_, groups) = load_content(&config)?;
            let groups: Vec<_> = groups.all().collect();
            println!("{}", serde_json::to_string_pretty(&groups)?);
            Ok(())
        }
        Commands::PrintConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn serve(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("content-service v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        api_prefix = %config.server.api_prefix,
        api_spec_file = %config.server.api_spec_file,
        "Configuration loaded"
    );

    let bind_address = config.server.bind_address.clone();
    let observability = config.observability.clone();
    let server = bootstrap(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if observability.metrics_enabled {
        if let Ok(addr) = observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
