use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a [`MockerConfig`](crate::config::MockerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Extension is not one of yaml, yml, json or jsonc
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
}
