//! Generic API structures and handlers
//!
//! This module contains the API server, the route table, the response
//! builder, and the rejection handler for the rewards API service. Every
//! JSON exit path goes through the single response builder so the header
//! set never drifts between branches; only verbatim-forwarded responses
//! bypass it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info};
use warp::http::header::{HeaderName, HeaderValue};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::hyper::Body;
use warp::{Filter, Rejection, Reply};

use crate::config::Config;
use crate::mint_client::Minter;

use super::{forward, mint};

// ============================================================================
// SHARED RESPONSE STRUCTURES
// ============================================================================

/// Route patterns reported on 404 responses.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = ["GET /", "POST /mint", "/metaupload/*", "/jammer/*"];

/// Health payload returned by GET /.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Fixed "online" marker
    pub status: String,
    /// Human-readable service description
    pub message: String,
    /// Service version
    pub version: String,
}

/// Error payload; `availableEndpoints` is populated on 404 responses only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong, the single source of truth for the request
    pub error: String,
    /// Known route patterns, reported when no route matched
    #[serde(
        rename = "availableEndpoints",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub available_endpoints: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Creates an error payload without the endpoint listing.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            available_endpoints: None,
        }
    }
}

// ============================================================================
// RESPONSE BUILDER
// ============================================================================

/// Fixed header set attached to every JSON response, success or error:
/// the CORS set, hardening headers, and the JSON content type.
fn fixed_headers() -> [(HeaderName, HeaderValue); 9] {
    use warp::http::header;
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS, PUT, DELETE, PATCH"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(
                "Content-Type, Authorization, X-Requested-With, X-Api-Key, X-Auth-Token, Origin, Accept, Access-Control-Allow-Headers",
            ),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ),
        (
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static("86400"),
        ),
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ),
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        ),
    ]
}

/// Builds a JSON response with the fixed header set.
///
/// # Arguments
///
/// * `status` - HTTP status code for this branch
/// * `body` - Serializable response payload
pub fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> warp::reply::Response {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    let mut response = warp::http::Response::new(Body::from(bytes));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    for (name, value) in fixed_headers() {
        headers.insert(name, value);
    }
    response
}

/// Empty 204 reply for CORS preflight probes, carrying the same header set.
pub fn preflight_reply() -> warp::reply::Response {
    let mut response = warp::http::Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    for (name, value) in fixed_headers() {
        headers.insert(name, value);
    }
    response
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Global rejection handler for all API routes.
///
/// This is the outermost guard: any rejection becomes a JSON response with
/// the fixed header set, so no failure escapes with an inconsistent shape.
///
/// # Arguments
///
/// * `rej` - The warp rejection to handle
///
/// # Returns
///
/// A reply with the matching error response
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if rej.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ErrorResponse {
                error: "endpoint not found".to_string(),
                available_endpoints: Some(
                    AVAILABLE_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
                ),
            },
        )
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("method not allowed"),
        )
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("internal server error"),
        )
    };

    Ok(json_reply(status, &body))
}

// ============================================================================
// API SERVER IMPLEMENTATION
// ============================================================================

/// REST API server for the rewards service.
///
/// This server exposes the health, mint, and forwarding endpoints. It is
/// stateless across requests: the only shared state is read-only
/// configuration and clients.
pub struct ApiServer {
    /// Service configuration
    config: Arc<Config>,
    /// Minting capability; absent when no signing credential is configured
    minter: Option<Arc<dyn Minter>>,
    /// HTTP client shared by the forwarding routes
    http_client: reqwest::Client,
}

impl ApiServer {
    /// Creates a new API server with the given components.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `minter` - Minting capability, or None when the credential is absent
    ///
    /// # Returns
    ///
    /// A new API server instance
    pub fn new(config: Config, minter: Option<Arc<dyn Minter>>) -> Self {
        Self {
            config: Arc::new(config),
            minter,
            http_client: reqwest::Client::new(),
        }
    }

    /// Starts the API server and begins handling HTTP requests.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Server ran to completion
    /// * `Err(anyhow::Error)` - Failed to start server
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting API server on {}:{}",
            self.config.api.host, self.config.api.port
        );

        let routes = self.create_routes();

        let addr: std::net::SocketAddr =
            format!("{}:{}", self.config.api.host, self.config.api.port)
                .parse()
                .context("Failed to parse API server address")?;

        warp::serve(routes).run(addr).await;

        Ok(())
    }

    /// Creates all API routes for the server.
    ///
    /// Routes are checked in a fixed precedence order: preflight first, then
    /// the forwarding prefixes, then the static health and mint routes. The
    /// rejection handler turns everything else into 404/405.
    ///
    /// # Returns
    ///
    /// A warp filter containing all API routes
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        let config = self.config.clone();
        let minter = self.minter.clone();
        let client = self.http_client.clone();

        // CORS preflight - 204 on any path, no validation, no side effects
        let preflight = warp::options()
            .and(warp::path::tail())
            .map(|_tail: warp::path::Tail| preflight_reply());

        // Forwarding prefixes take priority over the static routes:
        // /metaupload/mint forwards, it does not mint.
        let forward_meta = forward::forward_filter(
            "metaupload",
            config.forwarding.metaupload_url.clone(),
            client.clone(),
        );
        let forward_jammer =
            forward::forward_filter("jammer", config.forwarding.jammer_url.clone(), client);

        // Health check endpoint - fixed status payload, independent of
        // configuration state
        let health = warp::path::end().and(warp::get()).map(|| {
            json_reply(
                StatusCode::OK,
                &StatusResponse {
                    status: "online".to_string(),
                    message: "Mojo Token Rewards API is running".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            )
        });

        // Mint endpoint - validate the payload, then delegate to the minter
        let mint_route = warp::path("mint")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::bytes())
            .and_then(move |body: Bytes| {
                let config = config.clone();
                let minter = minter.clone();
                async move { mint::mint_handler(body, config, minter).await }
            });

        preflight
            .or(forward_meta)
            .or(forward_jammer)
            .or(health)
            .or(mint_route)
            .recover(handle_rejection)
    }

    /// Public method for testing - exposes routes for integration tests
    #[allow(dead_code)] // Used by tests
    pub fn test_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        self.create_routes()
    }
}
