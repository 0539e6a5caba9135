//! Mojo Token Rewards API Service
//!
//! An HTTP service that validates reward-minting requests and submits the
//! mint to the token contract on the configured chain, and proxies selected
//! path prefixes to other deployed services.
//!
//! ## Overview
//!
//! The service:
//! 1. Answers CORS preflight probes and a health check
//! 2. Validates POST /mint payloads and delegates to the mint capability
//! 3. Forwards /metaupload and /jammer requests to their bound targets
//!
//! ## Security Model
//!
//! The signing credential is provided via the MINTER_PRIVATE_KEY environment
//! variable and never appears in responses or logs. Without it the service
//! still serves health and forwarding; mint requests answer 500.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use rewards_api::api::ApiServer;
use rewards_api::config::Config;
use rewards_api::mint_client::{EvmMintClient, Minter};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point that initializes and runs the rewards API.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from the TOML file
/// 3. Builds the mint client when a signing credential is present
/// 4. Starts the API server and runs until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    info!("Starting Mojo Token Rewards API");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Mojo Token Rewards API");
        println!();
        println!("Usage: rewards-api [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  REWARDS_CONFIG_PATH   Path to config file (overrides --config)");
        println!("  MINTER_PRIVATE_KEY    Signing credential for the mint capability");
        return Ok(());
    }

    // Check for custom config path
    let mut config_path = None;
    for (i, arg) in args.iter().enumerate() {
        if arg == "--config" && i + 1 < args.len() {
            config_path = Some(args[i + 1].clone());
            break;
        }
    }

    if let Some(path) = config_path {
        std::env::set_var("REWARDS_CONFIG_PATH", &path);
        info!("Using custom config: {}", path);
    }

    // Load configuration from config file (or REWARDS_CONFIG_PATH env var)
    let config = Config::load()?;
    info!("Configuration loaded successfully");

    // Build the mint client when the signing credential is present
    let minter: Option<Arc<dyn Minter>> = match config.private_key.as_deref() {
        Some(key) => {
            let client = EvmMintClient::new(&config.chain, key)?;
            info!(
                "Mint client initialized for chain {} ({})",
                config.chain.name, config.chain.chain_id
            );
            Some(Arc::new(client))
        }
        None => {
            warn!("MINTER_PRIVATE_KEY is not set; /mint requests will be rejected");
            None
        }
    };

    // Run the service (this blocks until shutdown)
    let api_server = ApiServer::new(config, minter);
    api_server.run().await?;

    Ok(())
}
