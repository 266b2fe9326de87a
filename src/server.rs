//! Axum server setup, shared application state, and shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared, read-only route table and
//! the index-aligned per-route backend clients), [`build_router`] for
//! constructing the Axum router with middleware layers, [`serve`] for
//! running it until a shutdown future resolves, and [`shutdown_signal`]
//! for SIGTERM / Ctrl+C handling.

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::BounceError;
use crate::proxy;
use crate::proxy::backend::BackendClient;
use crate::proxy::routing::RouteTable;

/// Built once at startup; never mutated afterwards, so no locking.
#[derive(Debug)]
pub struct AppState {
    pub routes: RouteTable,
    /// `backends[i]` serves the route at index `i` of `routes`.
    pub backends: Vec<BackendClient>,
}

impl AppState {
    pub fn new(routes: RouteTable) -> Result<Self, BounceError> {
        let backends = routes
            .iter()
            .map(BackendClient::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes, backends })
    }
}

/// `max_body` is the only request body cap: axum's own 2 MiB default for
/// the `Bytes` extractor is switched off.
pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .fallback(proxy::dispatch_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drop the listener.
///
/// In-flight requests are not drained: their connection tasks keep
/// running only as long as the runtime does.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    tokio::select! {
        result = axum::serve(listener, router).into_future() => result,
        () = shutdown => {
            tracing::info!("listener closed");
            Ok(())
        }
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::RouteSpec;

    #[test]
    fn one_backend_per_route_in_order() {
        let routes = RouteTable::build(vec![
            RouteSpec::new("GET", "/a", "127.0.0.1", 9001),
            RouteSpec::new("GET", "/b", "127.0.0.1", 9002),
        ])
        .unwrap();
        let state = AppState::new(routes).unwrap();
        assert_eq!(state.backends.len(), 2);
        assert_eq!(state.backends[0].authority().port_u16(), Some(9001));
        assert_eq!(state.backends[1].authority().port_u16(), Some(9002));
    }
}
