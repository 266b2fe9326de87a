//! `bounce run` — start the proxy server.
//!
//! Loads the route configuration once, builds the route table and one
//! backend client per route, binds the listener and serves until
//! Ctrl+C / SIGTERM. Any configuration problem aborts before the
//! listener is bound.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::sources::{self, file_source::FileSource};
use crate::error::BounceError;
use crate::logging;
use crate::proxy::routing::RouteTable;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), BounceError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let source = resolve_config_source(&args).await?;
    let config = source.load().await?;

    let port = args.port.unwrap_or(config.http_port);
    let routes = RouteTable::build(config.routes)?;
    let route_count = routes.len();
    let state = Arc::new(AppState::new(routes)?);

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        routes = route_count,
        config = %source.path().display(),
        format = source.name(),
        "bounce started"
    );

    server::serve(listener, router, server::shutdown_signal()).await?;

    tracing::info!("bounce stopped");
    Ok(())
}

async fn resolve_config_source(args: &RunArgs) -> Result<FileSource, BounceError> {
    if let Some(ref path) = args.config {
        return sources::for_path(path);
    }

    sources::auto_detect().await?.ok_or_else(|| BounceError::NoConfigSource {
        hint: "Provide --config <file> or place a bounce.yaml in the working directory."
            .into(),
    })
}
