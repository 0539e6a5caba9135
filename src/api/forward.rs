//! Forwarding Proxy Module
//!
//! Path-prefix forwarding to independently deployed services. A matched
//! request is delegated in its entirety - method, headers, body - with the
//! prefix stripped from the path, and the upstream response is returned
//! verbatim with no header rewriting layered on top.

use tracing::{debug, error};
use warp::http::header;
use warp::http::{HeaderMap, Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::hyper::Body;
use warp::{Filter, Rejection};

use super::generic::{json_reply, ErrorResponse};

// ============================================================================
// URL REWRITING
// ============================================================================

/// Builds the upstream URL for a forwarded request.
///
/// Pure function: target base (trailing slash trimmed) + stripped path +
/// original query string, tested independently of any network call.
///
/// # Arguments
///
/// * `target` - Configured base URL of the forwarding target
/// * `tail` - Request path with the forwarding prefix removed
/// * `query` - Raw query string, when the request carried one
pub fn forward_url(target: &str, tail: &str, query: Option<&str>) -> String {
    let base = target.trim_end_matches('/');
    let mut url = format!("{}/{}", base, tail);
    if let Some(q) = query {
        url.push('?');
        url.push_str(q);
    }
    url
}

// ============================================================================
// WARP FILTER
// ============================================================================

/// Creates the route filter for one forwarding prefix.
///
/// # Arguments
///
/// * `prefix` - First path segment that selects this route
/// * `target` - Configured target base URL, when bound
/// * `client` - Shared HTTP client
///
/// # Returns
///
/// A warp filter that proxies matched requests
pub fn forward_filter(
    prefix: &'static str,
    target: Option<String>,
    client: reqwest::Client,
) -> impl Filter<Extract = (warp::reply::Response,), Error = Rejection> + Clone {
    warp::path(prefix)
        .and(warp::path::tail())
        .and(opt_raw_query())
        .and(warp::method())
        .and(warp::header::headers_cloned())
        .and(warp::body::bytes())
        .and_then(
            move |tail: warp::path::Tail,
                  query: Option<String>,
                  method: Method,
                  headers: HeaderMap,
                  body: Bytes| {
                let target = target.clone();
                let client = client.clone();
                async move {
                    forward_handler(prefix, target, client, tail, query, method, headers, body)
                        .await
                }
            },
        )
}

/// Extracts the raw query string when present.
fn opt_raw_query() -> impl Filter<Extract = (Option<String>,), Error = std::convert::Infallible> + Clone
{
    warp::query::raw()
        .map(Some)
        .or_else(|_| async { Ok::<(Option<String>,), std::convert::Infallible>((None,)) })
}

// ============================================================================
// FORWARD HANDLER
// ============================================================================

/// Delegates one request to the forwarding target and returns its response
/// verbatim. Failures are mapped to JSON errors through the response
/// builder; the handler never rejects.
#[allow(clippy::too_many_arguments)]
async fn forward_handler(
    prefix: &'static str,
    target: Option<String>,
    client: reqwest::Client,
    tail: warp::path::Tail,
    query: Option<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<warp::reply::Response, Rejection> {
    let target = match target {
        Some(t) => t,
        None => {
            // Operator error, not user input - the binding should exist.
            error!("No forwarding target configured for /{} requests", prefix);
            return Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new("forwarding target is not configured"),
            ));
        }
    };

    let url = forward_url(&target, tail.as_str(), query.as_deref());
    debug!("Forwarding {} /{}/{} -> {}", method, prefix, tail.as_str(), url);

    // Host and Content-Length are recomputed by the client for the new URL.
    let mut outbound = HeaderMap::new();
    for (name, value) in headers.iter() {
        if name == &header::HOST || name == &header::CONTENT_LENGTH {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    let upstream = match client
        .request(method, &url)
        .headers(outbound)
        .body(body.to_vec())
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!("Forwarding to {} failed: {}", url, e);
            return Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(format!("Failed to forward request: {}", e)),
            ));
        }
    };

    let status = upstream.status();
    // The body is re-framed, so the framing headers do not carry over.
    let mut response_headers = upstream.headers().clone();
    response_headers.remove(header::TRANSFER_ENCODING);
    response_headers.remove(header::CONNECTION);
    response_headers.remove(header::CONTENT_LENGTH);

    let bytes = match upstream.bytes().await {
        Ok(b) => b,
        Err(e) => {
            error!("Reading forwarded response from {} failed: {}", url, e);
            return Ok(json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(format!("Failed to forward request: {}", e)),
            ));
        }
    };

    let mut response = warp::http::Response::new(Body::from(bytes.to_vec()));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}
