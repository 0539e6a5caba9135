//! Test module organization
//!
//! This module re-exports test helpers for use in test files.

mod helpers;

#[allow(unused_imports)]
pub use helpers::{
    build_test_config, build_test_config_with_forwarding, CountingMinter, FailingMinter,
    StaticMinter, BAD_CHECKSUM_ADDR, CHECKSUMMED_RECIPIENT_ADDR, DUMMY_BLOCK_NUMBER,
    DUMMY_RECIPIENT_ADDR, DUMMY_TOKEN_CONTRACT_ADDR, DUMMY_TX_HASH,
};
