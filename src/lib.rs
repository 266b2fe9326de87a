//! bounce is a configuration-driven HTTP reverse proxy.
//!
//! It matches each inbound request against a fixed table of routes
//! (exact method + exact path), forwards it to the route's backend
//! within the route's timeout, and relays the backend's status, headers
//! and body back to the caller. Unmatched requests get a 404 without any
//! backend being contacted; every backend failure becomes a 500.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate).
//! - [`config`] -- Config file model, loading, and validation.
//! - [`error`] -- Startup and upstream error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core forwarding: route table, per-route backend clients,
//!   and the forward-and-relay handler.
//! - [`server`] -- Axum server setup, shared application state, and shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support _(enabled by default)_ |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file formats |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod server;
