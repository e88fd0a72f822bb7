use scanscope_api::ScopeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error("Manifest error: {0}")]
    Manifest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ScanscopeError>;
