//! Request dispatch.
//!
//! [`dispatch_handler`] is the Axum fallback that receives every inbound
//! request, looks it up in the [`RouteTable`](routing::RouteTable) and
//! either answers 404 straight away or hands the request to the route's
//! backend through [`handler::handle`]. Submodules cover route matching
//! ([`routing`]), the per-route client ([`backend`]), and forwarding plus
//! response relay ([`handler`]).

pub mod backend;
pub mod handler;
pub mod routing;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::server::AppState;
use handler::InboundRequest;

pub async fn dispatch_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let path = uri.path();

    let Some((route_idx, route)) = state.routes.match_route(method.as_str(), path) else {
        tracing::warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "no route matched"
        );
        return StatusCode::NOT_FOUND.into_response();
    };

    let Some(backend) = state.backends.get(route_idx) else {
        tracing::error!(
            request_id = %request_id,
            route = route_idx,
            "no backend client for matched route"
        );
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        backend = %route.authority(),
        "request received"
    );

    let request = InboundRequest {
        method,
        uri,
        headers,
        body,
    };

    handler::handle(backend, request, &request_id).await
}
