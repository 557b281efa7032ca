//! Error types for the fallible edges of the simulator
//!
//! The calculation and selection core never fails; errors only arise when
//! reading catalogs, touching the blob store, or loading configuration.

use thiserror::Error;

/// Errors raised while loading a product catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error reading catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Product at position {index} has no product code")]
    MissingCode { index: usize },

    #[error("Product {code} has no product type")]
    MissingKind { code: String },

    #[error("Unknown product type '{kind}'")]
    UnknownKind { kind: String },

    #[error("Unsupported catalog format: {path}")]
    UnsupportedFormat { path: String },
}

/// Errors raised by a blob store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error in blob store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed blob contents: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid blob key '{key}'")]
    InvalidKey { key: String },
}

/// Errors raised while loading simulation configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("{field} out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
