//! Generic async file-based config source.
//!
//! [`FileSource`] works for any file format by accepting a
//! deserialization function at construction time. It reads the file
//! through Tokio and validates the result before handing it out.

use std::path::{Path, PathBuf};

use crate::config::model::Config;
use crate::config::validation::validate;
use crate::error::BounceError;

pub type Deserialize = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserialize,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserialize) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_content(&self) -> Result<String, BounceError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BounceError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                BounceError::Io(e)
            }
        })
    }

    pub async fn load(&self) -> Result<Config, BounceError> {
        let content = self.read_content().await?;

        let config = (self.deserialize)(&content).map_err(|e| BounceError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if let Err(errors) = validate(&config) {
            return Err(BounceError::ConfigValidation { errors });
        }

        Ok(config)
    }
}
