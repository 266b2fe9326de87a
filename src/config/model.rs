//! Serde data structures for the bounce configuration file.
//!
//! [`Config`] is the root; each entry of `routes` is a [`RouteSpec`].
//! Defaults are resolved by serde at load time so the rest of the crate
//! never sees a missing timeout or port.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_HTTP_PORT: u16 = 8080;

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

const fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listening port. The key is the literal `http.port`.
    #[serde(rename = "http.port", default = "default_http_port")]
    pub http_port: u16,

    pub routes: Vec<RouteSpec>,
}

/// One configured route: exact method + path to a single backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    pub method: String,

    pub path: String,

    pub host: String,

    pub port: u16,

    /// Backend call timeout in milliseconds.
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,

    /// Talk HTTPS to the backend.
    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,
}

impl RouteSpec {
    #[must_use]
    pub fn new(method: &str, path: &str, host: &str, port: u16) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            host: host.into(),
            port,
            timeout: default_timeout(),
            tls: false,
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// `host:port`, with IPv6 literals bracketed.
    #[must_use]
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        if self.tls {
            "https"
        } else {
            "http"
        }
    }
}
