//! Unified error types for bounce.
//!
//! [`BounceError`] covers everything that can stop the proxy from
//! starting (config lookup, parsing, validation, binding). Failures of a
//! single forwarded request are [`UpstreamError`] values; they never
//! escape the proxy handler and always end up as an HTTP 500.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub route: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub(crate) fn root(field: &str, message: &str) -> Self {
        Self {
            route: "(root)".into(),
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  route {}: {}: {}", self.route, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BounceError {
    #[error("No config source found.\n\n  {hint}")]
    NoConfigSource { hint: String },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid backend address '{authority}': {source}")]
    UriParse {
        authority: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Why a forwarded request did not produce a backend response.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("backend did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("backend connection failed: {source}")]
    Connection {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("backend exchange failed: {source}")]
    Protocol {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl UpstreamError {
    /// Short label for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "connection",
            Self::Protocol { .. } => "protocol",
        }
    }
}

impl From<hyper_util::client::legacy::Error> for UpstreamError {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        if e.is_connect() {
            Self::Connection {
                source: Box::new(e),
            }
        } else {
            Self::Protocol {
                source: Box::new(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_includes_suggestion() {
        let e = ValidationError {
            route: "get /a".into(),
            field: "method".into(),
            message: "'get' is not a valid HTTP method".into(),
            suggestion: Some("did you mean 'GET'?".into()),
        };
        assert_eq!(
            e.to_string(),
            "  route get /a: method: 'get' is not a valid HTTP method (did you mean 'GET'?)"
        );
    }

    #[test]
    fn config_validation_lists_every_error() {
        let err = BounceError::ConfigValidation {
            errors: vec![
                ValidationError::root("routes", "first"),
                ValidationError::root("routes", "second"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("first"));
        assert!(text.contains("second"));
    }

    #[test]
    fn upstream_kinds() {
        assert_eq!(UpstreamError::Timeout { timeout_ms: 5 }.kind(), "timeout");
        let e = UpstreamError::Protocol {
            source: "bad".into(),
        };
        assert_eq!(e.kind(), "protocol");
    }
}
