//! One forward-and-relay cycle for a matched request.
//!
//! [`handle`] rebuilds the inbound request against the route's backend
//! (same method, same path and query, every header and the body copied
//! untouched), waits for the backend within the route timeout, and
//! relays status, headers and body back. Every upstream failure becomes
//! a bodyless 500; the failure kind only shows up in the logs.

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::uri::PathAndQuery;
use http::{HeaderMap, Method, StatusCode, Uri};

use super::backend::{BackendClient, UpstreamResponse};

/// The parts of an inbound request that are forwarded.
#[derive(Debug)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Path and query as received. An authority-form URI (`CONNECT host:port`)
    /// has none and forwards as `/`.
    #[must_use]
    pub fn path_and_query(&self) -> PathAndQuery {
        self.uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"))
    }
}

pub async fn handle(
    backend: &BackendClient,
    request: InboundRequest,
    request_id: &str,
) -> Response {
    let path_and_query = request.path_and_query();
    let method = request.method;

    tracing::debug!(
        request_id = %request_id,
        backend = %backend.authority(),
        headers = request.headers.len(),
        body_bytes = request.body.len(),
        "forwarding request"
    );

    match backend
        .send(method, path_and_query, request.headers, request.body)
        .await
    {
        Ok(upstream) => {
            tracing::info!(
                request_id = %request_id,
                backend = %backend.authority(),
                status = upstream.status.as_u16(),
                latency_ms = u64::try_from(upstream.latency.as_millis()).unwrap_or(u64::MAX),
                "backend responded"
            );
            relay(upstream)
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                backend = %backend.authority(),
                kind = e.kind(),
                error = %e,
                "backend call failed"
            );
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Copy a backend response onto the outbound response unchanged.
fn relay(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = upstream.headers;
    response
}
