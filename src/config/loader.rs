//! Config file loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::flatten::{flatten, FlatConfig};
use crate::error::{Error, Result};
use crate::resolve::expand_user;

/// Load a config file and return its flattened key -> value mapping.
///
/// The path has user-home shorthand expanded and is made absolute before the
/// existence check. Dispatch is by lowercased extension: `.toml` parses as a
/// TOML table, `.yaml`/`.yml` as a YAML mapping where an empty file yields an
/// empty config. Both formats are transcoded to the same neutral value type,
/// so equivalent files produce equal mappings.
///
/// # Errors
///
/// `ConfigNotFound` if the resolved path does not exist,
/// `UnsupportedConfigFormat` for any other extension, and the format's parse
/// error when the file is malformed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FlatConfig> {
    let path = absolutize(&expand_user(&path.as_ref().to_string_lossy()))?;
    if !path.exists() {
        return Err(Error::ConfigNotFound { path });
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let table = match extension.as_str() {
        "toml" => {
            let text = fs::read_to_string(&path)?;
            let table: toml::Table = toml::from_str(&text)?;
            into_table(serde_json::to_value(table))?
        }
        "yaml" | "yml" => {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                serde_json::Map::new()
            } else {
                let value: serde_yaml::Value = serde_yaml::from_str(&text)?;
                into_table(serde_json::to_value(value))?
            }
        }
        other => {
            return Err(Error::UnsupportedConfigFormat {
                extension: format!(".{other}"),
            })
        }
    };
    Ok(flatten(table))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn into_table(
    value: std::result::Result<Value, serde_json::Error>,
) -> Result<serde_json::Map<String, Value>> {
    match value {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) | Err(_) => Err(Error::ConfigRootNotTable),
    }
}
