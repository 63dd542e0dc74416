use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum NovelsyncError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed queue event: {0}")]
    MalformedEvent(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NovelsyncError>;
