//! Error types for Easel

use thiserror::Error;

/// The main error type for Easel operations
#[derive(Debug, Error)]
pub enum EaselError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Style guide error: {0}")]
    StyleError(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("No data returned from generation endpoint")]
    EmptyPayload,

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Easel operations
pub type Result<T> = std::result::Result<T, EaselError>;

impl From<serde_json::Error> for EaselError {
    fn from(err: serde_json::Error) -> Self {
        EaselError::JsonError(err.to_string())
    }
}

impl From<toml::de::Error> for EaselError {
    fn from(err: toml::de::Error) -> Self {
        EaselError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for EaselError {
    fn from(err: toml::ser::Error) -> Self {
        EaselError::TomlSerError(err.to_string())
    }
}
