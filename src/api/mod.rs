//! REST API Server Module
//!
//! This module provides the HTTP surface of the rewards service: the
//! preflight, health, mint, and forwarding routes, the response builder
//! that keeps the header set consistent on every branch, and the rejection
//! handler that maps unmatched requests to 404/405.

// Generic shared code (server, route table, response builder, rejections)
mod generic;

// Mint endpoint (request validation and delegation)
mod mint;

// Path-prefix forwarding proxy
mod forward;

// Re-export ApiServer for convenience
pub use generic::ApiServer;
// Re-export response envelopes for testing
#[allow(unused_imports)]
pub use generic::{ErrorResponse, StatusResponse, AVAILABLE_ENDPOINTS};
// Re-export mint validation functions and types for testing
#[allow(unused_imports)]
pub use mint::{validate_address, validate_mint_request, MintRequestError, MintResponse, ValidatedMint};
// Re-export the pure URL rewrite for testing
#[allow(unused_imports)]
pub use forward::forward_url;
