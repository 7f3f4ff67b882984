//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for the expected shape.
    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        /// File that was parsed.
        path: PathBuf,
        /// Parser error.
        source: toml::de::Error,
    },
    /// The file is not valid JSON for the expected shape.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// File that was parsed.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },
    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
