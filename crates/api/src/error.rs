use crate::models::ResourcePath;

/// Contract violations in how a caller addresses the scanner-config model.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("{kind} does not participate in scanner configuration")]
    UnsupportedScope { kind: &'static str },
}

/// Failures of the external discovery step (build run, output parsing).
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("build failed: {0}")]
    BuildFailed(String),
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("discovery cancelled")]
    Cancelled,
}

/// The resource-data factory refused to create data for a path.
#[derive(Debug, thiserror::Error)]
#[error("cannot create resource data for `{path}`: {reason}")]
pub struct ResourceDataError {
    pub path: ResourcePath,
    pub reason: String,
}

impl ResourceDataError {
    pub fn new(path: &ResourcePath, reason: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            reason: reason.into(),
        }
    }
}

pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;
