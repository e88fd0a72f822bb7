pub mod cache;
pub mod discovery;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use cache::CacheStats;
pub use discovery::{
    DiscoveryLoader, DiscoveryStore, InheritingDataFactory, NoopStore, ResourceDataFactory,
};
pub use error::{DiscoveryError, DiscoveryResult, ResourceDataError, ScopeError};
pub use models::*;
