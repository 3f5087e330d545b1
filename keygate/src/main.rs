//! Keygate - static API-key authentication in front of a small HTTP API
//!
//! This is the main entry point for the Keygate CLI.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use keygate_core::config::{ConfigLoader, KeygateConfig};

/// Keygate - API-key protected demo server
#[derive(Parser)]
#[command(name = "keygate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server with a configuration file
    Run {
        /// Path to the configuration file (.toml or .json)
        #[arg(default_value = "keygate.toml")]
        config: String,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file (.toml or .json)
        #[arg(default_value = "keygate.toml")]
        config: String,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config: config_path } => {
            let mut config = ConfigLoader::read(&config_path)
                .with_context(|| format!("Failed to load config '{}'", config_path))?;

            // Overrides log what they replace, so the subscriber must exist first
            init_tracing(&config, cli.verbose);
            config.apply_env();
            config
                .validate()
                .with_context(|| format!("Invalid config '{}'", config_path))?;

            tracing::info!("🚀 Starting Keygate v{}", keygate_core::VERSION);
            tracing::info!("📄 Loaded configuration from: {}", config_path);
            tracing::info!("🌍 Environment: {:?}", config.environment);

            let runtime = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
            runtime.block_on(keygate_api::run_server(&config))?;
        }

        Commands::Validate { config } => {
            init_tracing(&KeygateConfig::default(), cli.verbose);
            tracing::info!("Validating config: {}", config);

            match ConfigLoader::load(&config) {
                Ok(_) => println!("✅ Configuration '{}' is valid!", config),
                Err(e) => {
                    eprintln!("❌ Configuration Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Keygate v{}", keygate_core::VERSION);
        }
    }

    Ok(())
}

/// RUST_LOG wins over the configured level; `--verbose` wins over both
fn init_tracing(config: &KeygateConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
