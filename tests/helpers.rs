//! Shared test helpers for unit tests
//!
//! This module provides helper functions used by test files.
//!
//! The module is organized into several categories:
//! - **Constants**: Dummy addresses, hashes, and scores
//! - **Configuration Builders**: Functions to create test configurations
//! - **Minter Stubs**: Succeeding, failing, and invocation-counting minters

use async_trait::async_trait;
use ethers::core::types::{Address, U256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rewards_api::config::{ApiConfig, ChainConfig, Config, ForwardingConfig};
use rewards_api::mint_client::{MintError, MintReceipt, Minter};

// ============================================================================
// CONSTANTS
// ============================================================================

// ------------------------------- ACCOUNTS -------------------------------

/// Dummy recipient address (all lowercase, no checksum required)
pub const DUMMY_RECIPIENT_ADDR: &str = "0x000000000000000000000000000000000000000a";

/// Recipient address with a valid EIP-55 checksum
#[allow(dead_code)]
pub const CHECKSUMMED_RECIPIENT_ADDR: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

/// Mixed-case address whose checksum is wrong (first hex digit upcased)
#[allow(dead_code)]
pub const BAD_CHECKSUM_ADDR: &str = "0xFB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

// ------------------------- TOKENS AND CONTRACTS -------------------------

/// Dummy reward token contract address (EVM format, 20 bytes)
pub const DUMMY_TOKEN_CONTRACT_ADDR: &str = "0x000000000000000000000000000000000000000e";

// -------------------------------- OTHER ---------------------------------

/// Dummy transaction hash (64 hex characters)
pub const DUMMY_TX_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000012";

/// Dummy block number reported by the succeeding minter stub
pub const DUMMY_BLOCK_NUMBER: u64 = 1234567;

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Creates a minimal test configuration with no forwarding bindings.
pub fn build_test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        chain: ChainConfig {
            name: "Test Chain".to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            token_contract_addr: DUMMY_TOKEN_CONTRACT_ADDR.to_string(),
            token_decimals: 18,
        },
        forwarding: ForwardingConfig::default(),
        private_key: None,
    }
}

/// Creates a test configuration with the given forwarding bindings.
#[allow(dead_code)]
pub fn build_test_config_with_forwarding(
    metaupload_url: Option<String>,
    jammer_url: Option<String>,
) -> Config {
    let mut config = build_test_config();
    config.forwarding = ForwardingConfig {
        metaupload_url,
        jammer_url,
    };
    config
}

// ============================================================================
// MINTER STUBS
// ============================================================================

/// Minter stub that always succeeds with a fixed receipt.
pub struct StaticMinter;

#[async_trait]
impl Minter for StaticMinter {
    async fn mint(&self, _to: Address, _amount: U256) -> Result<MintReceipt, MintError> {
        Ok(MintReceipt {
            tx_hash: DUMMY_TX_HASH.to_string(),
            block_number: Some(DUMMY_BLOCK_NUMBER),
        })
    }
}

/// Minter stub that always fails, simulating a rejected delegate call.
#[allow(dead_code)]
pub struct FailingMinter;

#[async_trait]
impl Minter for FailingMinter {
    async fn mint(&self, _to: Address, _amount: U256) -> Result<MintReceipt, MintError> {
        Err(MintError::Submission(
            "insufficient funds for gas".to_string(),
        ))
    }
}

/// Minter stub that records invocations, to assert the capability is never
/// called when validation fails.
pub struct CountingMinter {
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingMinter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Minter for CountingMinter {
    async fn mint(&self, _to: Address, _amount: U256) -> Result<MintReceipt, MintError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MintReceipt {
            tx_hash: DUMMY_TX_HASH.to_string(),
            block_number: None,
        })
    }
}
