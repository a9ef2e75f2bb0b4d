use std::path::{Path, PathBuf};

use anyhow::Result;
use canopysim::config::{LoggingConfig, ServiceConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "canopy-sim",
    about = "Telemetry aggregation endpoint for drone-simulation test runs",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the telemetry endpoint
    Serve {
        /// Bind address (overrides network.listen_address)
        #[arg(long)]
        bind: Option<String>,

        /// Config file path (must load; otherwise CANOPY_SIM_CONFIG and the
        /// system file are tried)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    ShowConfig {
        /// Config file path (must load; otherwise CANOPY_SIM_CONFIG and the
        /// system file are tried)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Resolve the config with a stderr logger in place, so load failures and
/// fallbacks are visible before the configured subscriber exists.
fn resolve_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(bootstrap, || ServiceConfig::resolve(path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, config } => {
            let mut config = resolve_config(config.as_deref())?;
            if let Some(bind) = bind {
                config.network.listen_address = bind;
            }
            init_tracing(&config.logging);
            tracing::info!(bind = %config.network.listen_address, "Starting canopy-sim service");
            canopysim::serve(&config).await?;
        }
        Commands::ShowConfig { config } => {
            let config = resolve_config(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
