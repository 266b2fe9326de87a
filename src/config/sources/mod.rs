//! File-based config sources.
//!
//! Each supported format (YAML, JSON, TOML, gated by feature flags) maps
//! a file extension to a serde deserializer. [`for_path`] builds a
//! [`FileSource`] for a config file and [`parse_config_str`] parses an
//! in-memory document the same way.

pub mod file_source;

use std::path::Path;

use crate::config::model::Config;
use crate::error::BounceError;
use file_source::{Deserialize, FileSource};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// File names probed, in order, when no config file is given.
pub const AUTO_DETECT: &[&str] = &[
    "bounce.yaml",
    "bounce.yml",
    "bounce.json",
    "bounce.toml",
];

#[cfg(feature = "yaml")]
fn from_yaml(content: &str) -> Result<Config, BoxError> {
    serde_yml::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

#[cfg(feature = "json")]
fn from_json(content: &str) -> Result<Config, BoxError> {
    serde_json::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

/// TOML needs the dotted key quoted: `"http.port" = 8080`.
#[cfg(feature = "toml")]
fn from_toml(content: &str) -> Result<Config, BoxError> {
    toml::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

fn deserializer(ext: &str) -> Result<(&'static str, Deserialize), BounceError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(("yaml", from_yaml as Deserialize)),

        #[cfg(feature = "json")]
        "json" => Ok(("json", from_json as Deserialize)),

        #[cfg(feature = "toml")]
        "toml" => Ok(("toml", from_toml as Deserialize)),

        other => Err(BounceError::UnsupportedFormat(other.to_string())),
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

/// Parse a config string based on file extension. Does not validate.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, BounceError> {
    let (_, deserialize) = deserializer(ext)?;
    deserialize(content).map_err(|source| BounceError::ConfigParse {
        path: path_display.to_string(),
        source,
    })
}

/// Pick the source matching the file extension.
pub fn for_path(path: &Path) -> Result<FileSource, BounceError> {
    let (name, deserialize) = deserializer(extension(path))?;
    Ok(FileSource::new(path.to_path_buf(), name, deserialize))
}

/// Find the first auto-detected config file in the working directory.
pub async fn auto_detect() -> Result<Option<FileSource>, BounceError> {
    for name in AUTO_DETECT {
        let path = Path::new(name);
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return for_path(path).map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = for_path(Path::new("routes.xml")).err().unwrap();
        assert!(matches!(err, BounceError::UnsupportedFormat(ref ext) if ext == "xml"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn parse_error_names_the_file() {
        let err = parse_config_str("json", "{", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_reads_dotted_port_key() {
        let content = "http.port: 9090\nroutes:\n  - method: GET\n    path: /a\n    host: localhost\n    port: 9000\n";
        let config = parse_config_str("yml", content, "inline").unwrap();
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.routes[0].path, "/a");
    }
}
