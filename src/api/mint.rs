//! Mint Endpoint Module
//!
//! Request parsing, fixed-order validation, and the mint handler for
//! POST /mint. Validation short-circuits at the first failing rule, so a
//! request is never reported with more than one error.

use ethers::core::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;

use crate::config::Config;
use crate::mint_client::{score_to_base_units, Minter};

use super::generic::{json_reply, ErrorResponse};

// ============================================================================
// REQUEST/RESPONSE STRUCTURES
// ============================================================================

/// Body of a successful mint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintResponse {
    /// Hash of the confirmed transaction
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    /// Block the transaction was included in, when known
    #[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none", default)]
    pub block_number: Option<u64>,
}

/// A mint request that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMint {
    /// Recipient account
    pub address: Address,
    /// Decimal string form of the score, kept for lossless unit conversion
    pub score: String,
}

/// Rejection reasons for a mint request, one per rule, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintRequestError {
    /// Body failed JSON parsing
    InvalidJson,
    /// `address` absent or falsy
    MissingAddress,
    /// `mojoScore` absent or falsy
    MissingMojoScore,
    /// `address` present but not a valid account identifier
    InvalidAddressFormat,
    /// `mojoScore` present but not a finite number greater than zero
    NonPositiveScore,
}

impl MintRequestError {
    /// The wire message for this rejection.
    pub fn message(&self) -> &'static str {
        match self {
            MintRequestError::InvalidJson => "invalid JSON in request body",
            MintRequestError::MissingAddress => "missing address parameter",
            MintRequestError::MissingMojoScore => "missing mojoScore parameter",
            MintRequestError::InvalidAddressFormat => "invalid address format",
            MintRequestError::NonPositiveScore => "mojoScore must be a positive number",
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Returns true when a JSON value counts as absent for a required field.
///
/// Missing, `null`, `""`, `false`, and `0` are all treated as absent.
fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Validates an EVM account identifier.
///
/// Validity: a `0x`-prefixed string of 40 hex digits; mixed-case strings
/// must additionally carry a correct EIP-55 checksum. All-lowercase and
/// all-uppercase forms are accepted without a checksum.
///
/// # Arguments
///
/// * `raw` - Address string from the request
///
/// # Returns
///
/// * `Ok(Address)` - Parsed account identifier
/// * `Err(MintRequestError::InvalidAddressFormat)` - Length, hex, or checksum failure
pub fn validate_address(raw: &str) -> Result<Address, MintRequestError> {
    let hexpart = raw
        .strip_prefix("0x")
        .ok_or(MintRequestError::InvalidAddressFormat)?;
    if hexpart.len() != 40 || !hexpart.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MintRequestError::InvalidAddressFormat);
    }

    let address: Address = raw
        .parse()
        .map_err(|_| MintRequestError::InvalidAddressFormat)?;

    let has_lower = hexpart.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hexpart.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address, None) != raw {
        return Err(MintRequestError::InvalidAddressFormat);
    }

    Ok(address)
}

/// Applies the fixed validation order to a raw request body.
///
/// Order: JSON parse, address presence, score presence, address format,
/// score positivity. The first failing rule wins.
///
/// # Arguments
///
/// * `body` - Raw request body bytes
///
/// # Returns
///
/// * `Ok(ValidatedMint)` - Request passed every rule
/// * `Err(MintRequestError)` - The first rule that failed
pub fn validate_mint_request(body: &[u8]) -> Result<ValidatedMint, MintRequestError> {
    let parsed: Value =
        serde_json::from_slice(body).map_err(|_| MintRequestError::InvalidJson)?;

    let address_field = parsed.get("address");
    if is_falsy(address_field) {
        return Err(MintRequestError::MissingAddress);
    }

    let score_field = parsed.get("mojoScore");
    if is_falsy(score_field) {
        return Err(MintRequestError::MissingMojoScore);
    }

    let address = match address_field {
        Some(Value::String(s)) => validate_address(s)?,
        _ => return Err(MintRequestError::InvalidAddressFormat),
    };

    let score = match score_field {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return Err(MintRequestError::NonPositiveScore),
    };
    let numeric: f64 = score.parse().unwrap_or(f64::NAN);
    if !numeric.is_finite() || numeric <= 0.0 {
        return Err(MintRequestError::NonPositiveScore);
    }

    Ok(ValidatedMint { address, score })
}

// ============================================================================
// MINT HANDLER
// ============================================================================

/// Handler for POST /mint: validate the payload, convert the score to base
/// units, and delegate to the minting capability.
///
/// Every outcome is mapped to a response here; the handler never rejects.
pub async fn mint_handler(
    body: Bytes,
    config: Arc<Config>,
    minter: Option<Arc<dyn Minter>>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let validated = match validate_mint_request(&body) {
        Ok(v) => v,
        Err(e) => {
            info!("Rejected mint request: {}", e.message());
            return Ok(json_reply(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(e.message()),
            ));
        }
    };

    let minter = match minter {
        Some(m) => m,
        None => {
            // The credential detail stays server-side.
            error!("Mint request received but no signing credential is configured");
            return Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new("minting capability is not configured"),
            ));
        }
    };

    let amount = match score_to_base_units(&validated.score, config.chain.token_decimals) {
        Ok(a) => a,
        Err(e) => {
            error!("Score conversion failed: {}", e);
            return Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(format!("Failed to mint tokens: {}", e)),
            ));
        }
    };

    match minter.mint(validated.address, amount).await {
        Ok(receipt) => {
            info!(
                "Minted {} base units to {:?}: tx={}",
                amount, validated.address, receipt.tx_hash
            );
            Ok(json_reply(
                StatusCode::OK,
                &MintResponse {
                    tx_hash: receipt.tx_hash,
                    block_number: receipt.block_number,
                },
            ))
        }
        Err(e) => {
            error!("Mint delegation failed: {}", e);
            Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(format!("Failed to mint tokens: {}", e)),
            ))
        }
    }
}
