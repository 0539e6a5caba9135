//! Unit tests for configuration management
//!
//! These tests verify configuration parsing, defaults, and validation
//! without requiring external services.

use rewards_api::config::Config;

#[path = "mod.rs"]
mod test_helpers;
use test_helpers::DUMMY_TOKEN_CONTRACT_ADDR;

/// Test that default configuration creates valid structure
/// Why: Verify default config is valid and doesn't panic
#[test]
fn test_default_config_creation() {
    let config = Config::default();

    assert_eq!(config.api.host, "127.0.0.1");
    assert_eq!(config.chain.name, "Optimism");
    assert_eq!(config.chain.chain_id, 10);
    assert_eq!(config.chain.token_decimals, 18);
    assert!(config.validate().is_ok());
    assert!(
        config.forwarding.metaupload_url.is_none(),
        "Default config should have no metaupload binding"
    );
    assert!(
        config.forwarding.jammer_url.is_none(),
        "Default config should have no jammer binding"
    );
    assert!(config.private_key.is_none());
}

/// What is tested: Full TOML document parses into every section
/// Why: The template file shape must round-trip through serde
#[test]
fn test_full_toml_parse() {
    let toml = format!(
        r#"
[api]
host = "0.0.0.0"
port = 9090

[chain]
name = "Test Chain"
rpc_url = "http://127.0.0.1:8545"
chain_id = 31337
token_contract_addr = "{}"
token_decimals = 6

[forwarding]
metaupload_url = "http://127.0.0.1:9101"
jammer_url = "http://127.0.0.1:9102"
"#,
        DUMMY_TOKEN_CONTRACT_ADDR
    );

    let config: Config = toml::from_str(&toml).unwrap();
    assert_eq!(config.api.port, 9090);
    assert_eq!(config.chain.chain_id, 31337);
    assert_eq!(config.chain.token_decimals, 6);
    assert_eq!(
        config.forwarding.metaupload_url.as_deref(),
        Some("http://127.0.0.1:9101")
    );
    assert_eq!(
        config.forwarding.jammer_url.as_deref(),
        Some("http://127.0.0.1:9102")
    );
    assert!(config.validate().is_ok());
}

/// What is tested: Omitted optional settings fall back to their defaults
/// Why: Forwarding bindings and token_decimals are optional in the file
#[test]
fn test_minimal_toml_defaults() {
    let toml = format!(
        r#"
[api]
host = "127.0.0.1"
port = 8787

[chain]
name = "Test Chain"
rpc_url = "http://127.0.0.1:8545"
chain_id = 31337
token_contract_addr = "{}"
"#,
        DUMMY_TOKEN_CONTRACT_ADDR
    );

    let config: Config = toml::from_str(&toml).unwrap();
    assert_eq!(config.chain.token_decimals, 18);
    assert!(config.forwarding.metaupload_url.is_none());
    assert!(config.forwarding.jammer_url.is_none());
}

/// What is tested: The signing credential is never read from the file
/// Why: The credential comes from the environment only
#[test]
fn test_private_key_ignored_in_file() {
    let toml = format!(
        r#"
private_key = "0xdeadbeef"

[api]
host = "127.0.0.1"
port = 8787

[chain]
name = "Test Chain"
rpc_url = "http://127.0.0.1:8545"
chain_id = 31337
token_contract_addr = "{}"
"#,
        DUMMY_TOKEN_CONTRACT_ADDR
    );

    let config: Config = toml::from_str(&toml).unwrap();
    assert!(config.private_key.is_none());
}

/// What is tested: Malformed token contract addresses fail validation
/// Why: The contract address is a deploy-time constant that must be sound
#[test]
fn test_validate_rejects_bad_contract_addr() {
    let mut config = Config::default();

    config.chain.token_contract_addr = "not-hex".to_string();
    assert!(config.validate().is_err());

    config.chain.token_contract_addr = "0x1234".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("token_contract_addr"));

    // 32 bytes is a valid hex string but the wrong length for an account
    config.chain.token_contract_addr =
        "0x0000000000000000000000000000000000000000000000000000000000000001".to_string();
    assert!(config.validate().is_err());
}

/// What is tested: Malformed forwarding URLs fail validation
/// Why: A bad binding should fail at startup, not per request
#[test]
fn test_validate_rejects_bad_forwarding_url() {
    let mut config = Config::default();
    config.forwarding.metaupload_url = Some("not a url".to_string());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("metaupload_url"));

    let mut config = Config::default();
    config.forwarding.jammer_url = Some("also not a url".to_string());
    assert!(config.validate().is_err());
}
