// ============================================
// File: crates/ccnl-relay/src/main.rs
// ============================================
//! # ccnl Relay Entry Point
//!
//! ## Creation Reason
//! Main entry point for the relay binary. Handles CLI parsing, logging
//! setup and relay startup.
//!
//! ## Main Functionality
//! - CLI argument parsing with clap
//! - Logging initialization with tracing
//! - Configuration loading and validation
//! - Relay execution
//!
//! ## Usage
//! ```bash
//! # Start the relay with its crypto face
//! ccnl-relay start --config /etc/ccnl/relay.toml
//!
//! # Check a config file without starting
//! ccnl-relay validate --config /etc/ccnl/relay.toml
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The crypto service must listen on `crypto.service_path`
//! - `RUST_LOG` overrides `logging.level`
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ccnl_relay::{Relay, RelayConfig};

// ============================================
// CLI Definition
// ============================================

/// ccnl relay with an external crypto face
#[derive(Parser, Debug)]
#[command(name = "ccnl-relay")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay
    Start {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/ccnl/relay.toml")]
        config: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "/etc/ccnl/relay.toml")]
        config: PathBuf,
    },
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Start { config } => cmd_start(&config).await,
        Commands::Validate { config } => cmd_validate(&config).await,
    };

    if let Err(e) = result {
        // No-op if a command already installed the subscriber
        init_logging("info");
        error!("{:#}", e);
        std::process::exit(1);
    }
}

// ============================================
// Commands
// ============================================

/// Starts the relay.
async fn cmd_start(config_path: &Path) -> anyhow::Result<()> {
    let config = if config_path.exists() {
        RelayConfig::load(config_path).await?
    } else {
        RelayConfig::default()
    };

    init_logging(&config.logging.level);
    if !config_path.exists() {
        info!("Config file {} not found, using defaults", config_path.display());
    }

    let relay = Relay::new(config);
    relay.run().await?;
    Ok(())
}

/// Validates a configuration file and prints a summary.
async fn cmd_validate(config_path: &Path) -> anyhow::Result<()> {
    init_logging("warn");

    if !config_path.exists() {
        println!("⚠️  Config file not found: {}", config_path.display());
        println!("   Relay will use default values.");
        return Ok(());
    }

    let config = match RelayConfig::load(config_path).await {
        Ok(config) => config,
        Err(e) if e.is_config_error() => {
            println!("❌ Configuration is invalid");
            println!("   {e}");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("✅ Configuration is valid");
    println!();
    println!("Crypto face:");
    println!("   Enabled:    {}", config.crypto.enabled);
    println!("   Socket:     {}", config.crypto.socket_path.display());
    println!("   Service:    {}", config.crypto.service_path.display());
    println!("   Callback:   {}", config.crypto.callback);
    println!(
        "   Buffers:    {} packets ({} bytes)",
        config.crypto.buffer_packets,
        config.crypto.buffer_size()
    );
    println!();
    println!("Logging:");
    println!("   Level:      {}", config.logging.level);
    println!();

    Ok(())
}

// ============================================
// Helpers
// ============================================

/// Installs the tracing subscriber; `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .ok();
}
