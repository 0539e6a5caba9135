//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the rewards API
//! service. Configuration includes the API bind address, the target chain and
//! token contract, and the optional forwarding targets.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
///
/// This structure holds configuration for:
/// - API server bind address
/// - Target chain and token contract (fixed at deploy time)
/// - Optional forwarding-target bindings
/// - The signing credential, read from the environment rather than the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration (host, port)
    pub api: ApiConfig,
    /// Target chain and token contract configuration
    pub chain: ChainConfig,
    /// Forwarding-target bindings (both optional)
    #[serde(default)]
    pub forwarding: ForwardingConfig,
    /// Signing credential for the mint capability, from the
    /// MINTER_PRIVATE_KEY environment variable. Never serialized and never
    /// included in responses or logs.
    #[serde(skip)]
    pub private_key: Option<String>,
}

/// API server configuration for external communication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind the API server to
    pub host: String,
    /// Port number to bind the API server to
    pub port: u16,
}

/// Configuration for the EVM chain hosting the reward token contract.
///
/// Contract address and network are deploy-time constants, never request
/// parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Human-readable name for the chain
    pub name: String,
    /// RPC endpoint URL for chain communication
    pub rpc_url: String,
    /// Chain ID (e.g., 10 for Optimism mainnet)
    pub chain_id: u64,
    /// Address of the reward token contract
    pub token_contract_addr: String,
    /// Fixed-point scale of the token. Confirm against the deployed
    /// contract's decimals; the service never re-derives it.
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
}

fn default_token_decimals() -> u32 {
    18
}

/// Forwarding-target bindings for the path-prefix proxy routes.
///
/// A request under a prefix whose binding is absent is answered with a 500;
/// an absent binding is an operator error, not user input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardingConfig {
    /// Target service for /metaupload/* requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metaupload_url: Option<String>,
    /// Target service for /jammer/* requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jammer_url: Option<String>,
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates the configuration.
    ///
    /// This function ensures that:
    /// - The token contract address is a 20-byte 0x-prefixed hex string
    /// - Configured forwarding URLs parse as URLs
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - A setting is malformed
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_hex_addr(&self.chain.token_contract_addr, 20)
            .map_err(|e| anyhow::anyhow!("Invalid token_contract_addr: {}", e))?;

        if let Some(ref target) = self.forwarding.metaupload_url {
            url::Url::parse(target)
                .map_err(|e| anyhow::anyhow!("Invalid metaupload_url: {}", e))?;
        }
        if let Some(ref target) = self.forwarding.jammer_url {
            url::Url::parse(target)
                .map_err(|e| anyhow::anyhow!("Invalid jammer_url: {}", e))?;
        }

        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// This function:
    /// 1. Checks if config/rewards.toml exists (path overridable via the
    ///    REWARDS_CONFIG_PATH environment variable)
    /// 2. If it exists, loads, parses, and validates the configuration
    /// 3. Reads the signing credential from MINTER_PRIVATE_KEY
    /// 4. If it doesn't exist, returns an error asking the user to copy the
    ///    template
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - Failed to load configuration or validation failed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("REWARDS_CONFIG_PATH")
            .unwrap_or_else(|_| "config/rewards.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate()?;
            config.private_key = std::env::var("MINTER_PRIVATE_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/rewards.template.toml config/rewards.toml\n\
                Then edit config/rewards.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Creates a default configuration with placeholder values.
    ///
    /// This configuration is suitable for local development and testing.
    /// For production use, the chain values must match the deployed token
    /// contract and the signing credential must be provided.
    pub fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8787,
            },
            chain: ChainConfig {
                name: "Optimism".to_string(),
                rpc_url: "https://mainnet.optimism.io".to_string(),
                chain_id: 10,
                token_contract_addr: "0xf9e7D3cd71Ee60C7A3A64Fa7Fcb81e610Ce1daA5".to_string(),
                token_decimals: 18,
            },
            forwarding: ForwardingConfig::default(),
            private_key: None,
        }
    }
}

/// Validates a `0x`-prefixed hex address with expected byte length.
///
/// # Arguments
///
/// * `addr` - `0x`-prefixed hex string
/// * `expected_len` - Expected byte length
///
/// # Returns
///
/// - `Ok(())` - Address format matches expected length
/// - `Err(anyhow::Error)` - Address format is invalid
fn validate_hex_addr(addr: &str, expected_len: usize) -> anyhow::Result<()> {
    let stripped = addr
        .strip_prefix("0x")
        .ok_or_else(|| anyhow::anyhow!("Address must be 0x-prefixed hex string"))?;
    let bytes = hex::decode(stripped).map_err(|_| anyhow::anyhow!("Invalid hex address"))?;
    if bytes.len() != expected_len {
        anyhow::bail!("Invalid address length: expected {} bytes", expected_len);
    }
    Ok(())
}
