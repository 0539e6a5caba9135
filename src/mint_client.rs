//! Mint Client Module
//!
//! This module provides the minting capability consumed by the API: a trait
//! for delegating reward mints and an implementation backed by an EVM signer
//! wallet and the deployed token contract. Each call is a single best-effort
//! attempt; a failure gives the caller no guarantee about whether the
//! on-chain effect occurred.

use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::core::types::{Address, U256, U64};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::{parse_units, ParseUnits};
use std::sync::Arc;
use tracing::info;

use crate::config::ChainConfig;

abigen!(
    MojoToken,
    r#"[
        function mintTo(address to, uint256 amount)
    ]"#
);

// ============================================================================
// TYPES
// ============================================================================

/// Result of a submitted mint transaction.
///
/// Opaque beyond these fields; the router does not interpret it further.
#[derive(Debug, Clone)]
pub struct MintReceipt {
    /// Hash of the confirmed transaction
    pub tx_hash: String,
    /// Block the transaction was included in, when the receipt carries one
    pub block_number: Option<u64>,
}

/// Errors surfaced by the minting capability.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    /// Signing credential or client setup problem.
    #[error("mint client setup failed: {0}")]
    Setup(String),

    /// Score could not be converted to a token amount.
    #[error("invalid token amount: {0}")]
    InvalidAmount(String),

    /// Transaction submission or confirmation failed.
    #[error("{0}")]
    Submission(String),

    /// The contract rejected the mint.
    #[error("contract reverted: {0}")]
    Reverted(String),
}

/// Capability for minting reward tokens to an account.
///
/// One outbound call per valid request, never retried by this layer.
#[async_trait]
pub trait Minter: Send + Sync {
    /// Mints `amount` base units of the reward token to `to`.
    async fn mint(&self, to: Address, amount: U256) -> Result<MintReceipt, MintError>;
}

// ============================================================================
// EVM MINT CLIENT
// ============================================================================

type TokenContract = MojoToken<SignerMiddleware<Provider<Http>, LocalWallet>>;

/// Mint client backed by an EVM signer wallet and the deployed token contract.
pub struct EvmMintClient {
    /// Bound token contract with the signing middleware attached
    contract: TokenContract,
}

impl EvmMintClient {
    /// Creates a new mint client for the configured chain.
    ///
    /// # Arguments
    ///
    /// * `chain` - Target chain and token contract configuration
    /// * `private_key` - Hex-encoded signing key (0x prefix optional)
    ///
    /// # Returns
    ///
    /// * `Ok(EvmMintClient)` - Successfully created client
    /// * `Err(MintError)` - RPC URL, key, or contract address is malformed
    pub fn new(chain: &ChainConfig, private_key: &str) -> Result<Self, MintError> {
        let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
            .map_err(|e| MintError::Setup(format!("invalid RPC URL: {}", e)))?;

        // The key text never appears in errors or logs.
        let wallet: LocalWallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse()
            .map_err(|_| MintError::Setup("invalid signing key".to_string()))?;
        let wallet = wallet.with_chain_id(chain.chain_id);

        let contract_addr: Address = chain.token_contract_addr.parse().map_err(|e| {
            MintError::Setup(format!("invalid token contract address: {}", e))
        })?;

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Ok(Self {
            contract: MojoToken::new(contract_addr, client),
        })
    }
}

#[async_trait]
impl Minter for EvmMintClient {
    async fn mint(&self, to: Address, amount: U256) -> Result<MintReceipt, MintError> {
        info!("Submitting mintTo: recipient={:?}, amount={}", to, amount);

        let call = self.contract.mint_to(to, amount);
        let pending = call.send().await.map_err(|e| {
            if let Some(reason) = e.decode_revert::<String>() {
                MintError::Reverted(reason)
            } else {
                MintError::Submission(e.to_string())
            }
        })?;

        let receipt = pending
            .await
            .map_err(|e| MintError::Submission(e.to_string()))?
            .ok_or_else(|| {
                MintError::Submission("transaction dropped from the mempool".to_string())
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(MintError::Reverted(format!(
                "transaction {:?} reverted on-chain",
                receipt.transaction_hash
            )));
        }

        info!(
            "Mint confirmed: tx={:?}, block={:?}",
            receipt.transaction_hash, receipt.block_number
        );

        Ok(MintReceipt {
            tx_hash: format!("{:?}", receipt.transaction_hash),
            block_number: receipt.block_number.map(|b| b.as_u64()),
        })
    }
}

// ============================================================================
// UNIT CONVERSION
// ============================================================================

/// Converts a validated mojo score into token base units.
///
/// The score is kept in decimal string form by the validator so the
/// conversion is lossless. More fractional digits than the token's scale is
/// an error rather than silent truncation.
///
/// # Arguments
///
/// * `score` - Decimal string form of the score (already validated > 0)
/// * `decimals` - Fixed-point scale of the token
///
/// # Returns
///
/// * `Ok(U256)` - Score scaled to base units
/// * `Err(MintError)` - Score does not fit the token's fixed-point scale
pub fn score_to_base_units(score: &str, decimals: u32) -> Result<U256, MintError> {
    let parsed =
        parse_units(score, decimals).map_err(|e| MintError::InvalidAmount(e.to_string()))?;
    match parsed {
        ParseUnits::U256(amount) => Ok(amount),
        ParseUnits::I256(_) => Err(MintError::InvalidAmount(
            "amount must not be negative".to_string(),
        )),
    }
}
