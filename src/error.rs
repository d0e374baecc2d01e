// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No listing with the given id in the collection.
    #[error("listing not found: {0}")]
    NotFound(String),

    /// Admin secret missing or wrong.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Remote tier answered, but not with something we can use.
    #[error("remote store error: {0}")]
    Remote(String),

    /// Bad or incomplete configuration.
    #[error("config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
