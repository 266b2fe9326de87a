//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors: an empty route list, unknown or mis-cased HTTP methods, paths
//! that do not start with `/`, and unusable backend addresses. Every
//! problem is collected so the user can fix them in one pass.

use super::model::{Config, RouteSpec};
use crate::error::ValidationError;

pub const VALID_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "TRACE", "CONNECT",
];

/// Validate a single route path. Returns `Ok(())` or a human-readable error.
pub fn validate_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err("path must start with '/'".into());
    }
    Ok(())
}

/// Validate an HTTP method string. Matching is case-sensitive, so
/// `get` is rejected rather than silently never matching.
pub fn validate_method(method: &str) -> Result<(), String> {
    if VALID_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(format!("'{method}' is not a valid HTTP method"))
    }
}

/// Validate a backend host name or IP literal.
pub fn validate_host(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("host cannot be empty".into());
    }
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if bare.parse::<std::net::Ipv6Addr>().is_ok() {
        return Ok(());
    }
    url::Host::parse(host)
        .map(|_| ())
        .map_err(|e| format!("'{host}' is not a valid host ({e})"))
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    if config.routes.is_empty() {
        return Err(vec![ValidationError::root(
            "routes",
            "at least one route must be defined",
        )]);
    }

    let mut errors = Vec::new();

    for (i, route) in config.routes.iter().enumerate() {
        validate_route(i, route, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(index: usize, route: &RouteSpec, errors: &mut Vec<ValidationError>) {
    let route_id = if route.path.is_empty() || route.method.is_empty() {
        format!("routes[{index}]")
    } else {
        format!("{} {}", route.method, route.path)
    };

    let mut push = |field: &str, message: String, suggestion: Option<String>| {
        errors.push(ValidationError {
            route: route_id.clone(),
            field: field.into(),
            message,
            suggestion,
        });
    };

    if let Err(msg) = validate_method(&route.method) {
        let upper = route.method.to_ascii_uppercase();
        let suggestion = VALID_METHODS
            .contains(&upper.as_str())
            .then(|| format!("did you mean '{upper}'?"));
        push("method", msg, suggestion);
    }

    if let Err(msg) = validate_path(&route.path) {
        let suggestion =
            (!route.path.is_empty()).then(|| format!("did you mean '/{}'?", route.path));
        push("path", msg, suggestion);
    }

    if let Err(msg) = validate_host(&route.host) {
        push("host", msg, None);
    }

    if route.port == 0 {
        push("port", "port must be between 1 and 65535".into(), None);
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!(
        "  {} routes, listening on port {}\n",
        config.routes.len(),
        config.http_port
    )];

    for route in &config.routes {
        lines.push(format!(
            "  {} {}  -> {}://{}",
            route.method,
            route.path,
            route.scheme(),
            route.authority(),
        ));
        lines.push(format!("    timeout: {}ms", route.timeout));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}
