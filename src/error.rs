//! Error types for Generar

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("unsupported config extension: {extension}. Use .toml, .yaml, or .yml")]
    UnsupportedConfigFormat { extension: String },

    #[error("config root must be a table")]
    ConfigRootNotTable,

    #[error("failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to parse YAML config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("config value for `{key}` is invalid: {message}")]
    InvalidConfigValue { key: String, message: String },

    #[error("invalid LoRA entry: {message}")]
    InvalidLoraEntry { message: String },

    #[error("missing required parameter: {name}")]
    MissingParameter { name: &'static str },

    #[error(transparent)]
    Hub(#[from] hf_hub::api::sync::ApiError),

    #[error("repository {repo_id} has no downloadable files")]
    SnapshotEmpty { repo_id: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
