//! TOML parsing with file context on failure.

use anyhow::{Context, Result};
use std::path::Path;

/// Reads `path` and deserializes it as TOML into `T`.
///
/// # Errors
///
/// Fails with "Failed to read config file: <path>" when the file cannot be
/// read, and "Failed to parse config file: <path>" when the content is not
/// valid TOML for `T`. The underlying error is kept as the cause.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
