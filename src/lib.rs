//! Mojo Token Rewards API Library
//!
//! This crate provides an HTTP-facing request handler that validates inbound
//! reward-minting requests, delegates the on-chain mint to a wallet-backed
//! capability, and forwards configured path prefixes to other independently
//! deployed services. The handler is stateless across requests; nothing
//! outlives a single request/response cycle.

pub mod api;
pub mod config;
pub mod mint_client;

// Re-export commonly used types
pub use config::{ApiConfig, ChainConfig, Config, ForwardingConfig};
pub use mint_client::{score_to_base_units, EvmMintClient, MintError, MintReceipt, Minter};
