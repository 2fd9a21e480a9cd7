use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("required override file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read override file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse override file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("override value for '{0}' must be a scalar")]
    UnsupportedValue(String),

    #[error("'{0}' does not address the section and entry it was written for")]
    InvalidKey(String),
}
