//! Format detection for configuration files.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::ConfigError;

/// Reads `path` and deserializes it as TOML or JSON, chosen by extension.
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let extension = path.extension().and_then(|ext| ext.to_str());
    if !matches!(extension, Some("toml" | "json")) {
        return Err(ConfigError::UnsupportedFormat(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

    if extension == Some("toml") {
        toml::from_str(&contents)
            .map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
    } else {
        serde_json::from_str(&contents)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
    }
}
